//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub class_id: Option<i64>,
    #[sea_orm(unique)]
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthday: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub status: String,
    pub enrolled_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id",
        on_delete = "SetNull"
    )]
    Class,
    #[sea_orm(has_many = "super::exam_results::Entity")]
    ExamResults,
    #[sea_orm(has_many = "super::fees::Entity")]
    Fees,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::exam_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExamResults.def()
    }
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::common::Gender;
        use crate::models::students::entities::{Student, StudentStatus};

        Student {
            id: self.id,
            user_id: self.user_id,
            parent_id: self.parent_id,
            class_id: self.class_id,
            admission_no: self.admission_no,
            first_name: self.first_name,
            last_name: self.last_name,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Other),
            birthday: super::parse_date(self.birthday),
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            address: self.address,
            status: self
                .status
                .parse::<StudentStatus>()
                .unwrap_or(StudentStatus::Active),
            enrolled_at: super::from_timestamp(self.enrolled_at),
            created_at: super::from_timestamp(self.created_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

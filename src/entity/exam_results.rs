//! 考试成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exam_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub remark: Option<String>,
    pub recorded_by: Option<i64>,
    pub recorded_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exams::Entity",
        from = "Column::ExamId",
        to = "super::exams::Column::Id",
        on_delete = "Cascade"
    )]
    Exam,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
}

impl Related<super::exams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exam.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(self) -> crate::models::results::entities::ExamResult {
        crate::models::results::entities::ExamResult {
            id: self.id,
            exam_id: self.exam_id,
            student_id: self.student_id,
            score: self.score,
            remark: self.remark,
            recorded_by: self.recorded_by,
            recorded_at: super::from_timestamp(self.recorded_at),
            updated_at: super::from_timestamp(self.updated_at),
        }
    }
}

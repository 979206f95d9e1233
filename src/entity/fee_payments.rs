//! 缴费记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fee_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_id: i64,
    pub amount_cents: i64,
    pub method: String,
    pub reference: Option<String>,
    pub received_by: Option<i64>,
    pub paid_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fees::Entity",
        from = "Column::FeeId",
        to = "super::fees::Column::Id",
        on_delete = "Cascade"
    )]
    Fee,
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::fees::entities::FeePayment {
        use crate::models::fees::entities::{FeePayment, PaymentMethod};

        FeePayment {
            id: self.id,
            fee_id: self.fee_id,
            amount_cents: self.amount_cents,
            method: self
                .method
                .parse::<PaymentMethod>()
                .unwrap_or(PaymentMethod::Other),
            reference: self.reference,
            received_by: self.received_by,
            paid_at: super::from_timestamp(self.paid_at),
        }
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学费表
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fees::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Fees::Title).string().not_null())
                    .col(ColumnDef::new(Fees::Term).string().not_null())
                    .col(ColumnDef::new(Fees::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Fees::DueDate).big_integer().not_null())
                    .col(ColumnDef::new(Fees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Fees::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fees::Table, Fees::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建缴费记录表
        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeePayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FeePayments::FeeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(FeePayments::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeePayments::Method).string().not_null())
                    .col(ColumnDef::new(FeePayments::Reference).string().null())
                    .col(ColumnDef::new(FeePayments::ReceivedBy).big_integer().null())
                    .col(ColumnDef::new(FeePayments::PaidAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeePayments::Table, FeePayments::FeeId)
                            .to(Fees::Table, Fees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeePayments::Table, FeePayments::ReceivedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fees_student_id")
                    .table(Fees::Table)
                    .col(Fees::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fee_payments_fee_id")
                    .table(FeePayments::Table)
                    .col(FeePayments::FeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeePayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Fees {
    #[sea_orm(iden = "fees")]
    Table,
    Id,
    StudentId,
    Title,
    Term,
    AmountCents,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FeePayments {
    #[sea_orm(iden = "fee_payments")]
    Table,
    Id,
    FeeId,
    AmountCents,
    Method,
    Reference,
    ReceivedBy,
    PaidAt,
}

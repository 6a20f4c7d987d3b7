use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bursaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bursaries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bursaries::BursaryName).string().not_null())
                    .col(ColumnDef::new(Bursaries::Description).text())
                    .col(ColumnDef::new(Bursaries::EndDate).date().not_null())
                    .col(ColumnDef::new(Bursaries::AmountAllocated).double())
                    .col(ColumnDef::new(Bursaries::AmountPerStudent).double())
                    .col(
                        ColumnDef::new(Bursaries::AllocationType)
                            .string()
                            .not_null()
                            .check(Expr::col(Bursaries::AllocationType).is_in(["fixed", "variable"])),
                    )
                    .col(
                        ColumnDef::new(Bursaries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Bursaries::Table)
                    .col(Bursaries::CreatedAt)
                    .name("idx_bursaries_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bursaries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bursaries {
    Table,
    Id,
    BursaryName,
    Description,
    EndDate,
    AmountAllocated,
    AmountPerStudent,
    AllocationType,
    CreatedAt,
}

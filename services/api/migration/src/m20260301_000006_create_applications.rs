use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Applications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Applications::BursaryId).uuid().not_null())
                    .col(ColumnDef::new(Applications::StudentId).uuid().not_null())
                    .col(
                        ColumnDef::new(Applications::Stage)
                            .string()
                            .not_null()
                            .default("submitted"),
                    )
                    .col(ColumnDef::new(Applications::Remarks).text())
                    .col(
                        ColumnDef::new(Applications::SoftDelete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Applications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Applications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::BursaryId)
                            .to(Bursaries::Table, Bursaries::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Applications::Table, Applications::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Applications::Table)
                    .col(Applications::Stage)
                    .col(Applications::SoftDelete)
                    .name("idx_applications_stage_soft_delete")
                    .to_owned(),
            )
            .await?;

        // At most one active application per (student, bursary); withdrawn rows are kept.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_applications_active_student_bursary \
                 ON applications (student_id, bursary_id) WHERE soft_delete = false",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Applications {
    Table,
    Id,
    BursaryId,
    StudentId,
    Stage,
    Remarks,
    SoftDelete,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Bursaries {
    Table,
    Id,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

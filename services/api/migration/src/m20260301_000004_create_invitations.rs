use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminsInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminsInvitations::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminsInvitations::AdminId).uuid().not_null())
                    .col(
                        ColumnDef::new(AdminsInvitations::Expiry)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminsInvitations::Table, AdminsInvitations::AdminId)
                            .to(SystemUsers::Table, SystemUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentsInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentsInvitations::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentsInvitations::StudentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentsInvitations::Expiry)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentsInvitations::Table, StudentsInvitations::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentsInvitations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdminsInvitations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminsInvitations {
    Table,
    Token,
    AdminId,
    Expiry,
}

#[derive(Iden)]
enum StudentsInvitations {
    Table,
    Token,
    StudentId,
    Expiry,
}

#[derive(Iden)]
enum SystemUsers {
    Table,
    Id,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemUsers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SystemUsers::Firstname).string().not_null())
                    .col(ColumnDef::new(SystemUsers::Middlename).string())
                    .col(ColumnDef::new(SystemUsers::Lastname).string().not_null())
                    .col(
                        ColumnDef::new(SystemUsers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SystemUsers::Password).string().not_null())
                    .col(
                        ColumnDef::new(SystemUsers::Blocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SystemUsers::Activated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SystemUsers::FirstTimeLogin)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SystemUsers::RoleId).integer().not_null())
                    .col(ColumnDef::new(SystemUsers::RoleCode).string())
                    .col(
                        ColumnDef::new(SystemUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SystemUsers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SystemUsers::Table, SystemUsers::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SystemUsers {
    Table,
    Id,
    Firstname,
    Middlename,
    Lastname,
    Email,
    Password,
    Blocked,
    Activated,
    FirstTimeLogin,
    RoleId,
    RoleCode,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
}

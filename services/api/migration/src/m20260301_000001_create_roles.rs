use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `(name, description, level)`; higher level means more authority.
const SEED_ROLES: [(&str, &str, i32); 6] = [
    ("student", "Bursary applicant", 1),
    ("ward", "Ward-level reviewer", 2),
    ("county", "County-level reviewer", 3),
    ("finance-assistant", "Ministry finance assistant", 4),
    ("finance", "Finance officer, authorises disbursement", 5),
    ("super-admin", "Manages admin accounts", 6),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Roles::Description).string().not_null())
                    .col(ColumnDef::new(Roles::Level).integer().not_null())
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(Roles::Table)
            .columns([Roles::Name, Roles::Description, Roles::Level]);
        for (name, description, level) in SEED_ROLES {
            seed.values_panic([name.into(), description.into(), level.into()]);
        }
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
    Level,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentsPersonal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentsPersonal::StudentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentsPersonal::Dob).date().not_null())
                    .col(ColumnDef::new(StudentsPersonal::Gender).string().not_null())
                    .col(ColumnDef::new(StudentsPersonal::Citizenship).string().not_null())
                    .col(ColumnDef::new(StudentsPersonal::BirthCounty).string().not_null())
                    .col(
                        ColumnDef::new(StudentsPersonal::BirthSubCounty)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentsPersonal::Ward).string().not_null())
                    .col(ColumnDef::new(StudentsPersonal::Residence).string().not_null())
                    .col(ColumnDef::new(StudentsPersonal::IdNumber).string())
                    .col(ColumnDef::new(StudentsPersonal::Phone).string().not_null())
                    .col(
                        ColumnDef::new(StudentsPersonal::SpecialNeed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(StudentsPersonal::SpecialNeedsType).string())
                    .col(
                        ColumnDef::new(StudentsPersonal::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentsPersonal::Table, StudentsPersonal::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentsInstitution::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentsInstitution::StudentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentsInstitution::InstName).string().not_null())
                    .col(ColumnDef::new(StudentsInstitution::InstType).string().not_null())
                    .col(ColumnDef::new(StudentsInstitution::InstCounty).string().not_null())
                    .col(
                        ColumnDef::new(StudentsInstitution::InstSubCounty)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentsInstitution::PrincipalName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentsInstitution::YearJoined)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentsInstitution::CurrClassLevel)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentsInstitution::AdmNo).string().not_null())
                    .col(ColumnDef::new(StudentsInstitution::BankName).string().not_null())
                    .col(ColumnDef::new(StudentsInstitution::BankBranch).string().not_null())
                    .col(ColumnDef::new(StudentsInstitution::BankAccName).string().not_null())
                    .col(ColumnDef::new(StudentsInstitution::BankAccNo).string().not_null())
                    .col(
                        ColumnDef::new(StudentsInstitution::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentsInstitution::Table, StudentsInstitution::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentsInstitution::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentsPersonal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StudentsPersonal {
    Table,
    StudentId,
    Dob,
    Gender,
    Citizenship,
    BirthCounty,
    BirthSubCounty,
    Ward,
    Residence,
    IdNumber,
    Phone,
    SpecialNeed,
    SpecialNeedsType,
    UpdatedAt,
}

#[derive(Iden)]
enum StudentsInstitution {
    Table,
    StudentId,
    InstName,
    InstType,
    InstCounty,
    InstSubCounty,
    PrincipalName,
    YearJoined,
    CurrClassLevel,
    AdmNo,
    BankName,
    BankBranch,
    BankAccName,
    BankAccNo,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

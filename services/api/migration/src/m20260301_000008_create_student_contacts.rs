use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentsSponsor::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentsSponsor::StudentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentsSponsor::Name).string().not_null())
                    .col(
                        ColumnDef::new(StudentsSponsor::SponsorshipType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentsSponsor::SponsorshipNature)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentsSponsor::Phone).string().not_null())
                    .col(ColumnDef::new(StudentsSponsor::Email).string())
                    .col(ColumnDef::new(StudentsSponsor::Address).string())
                    .col(ColumnDef::new(StudentsSponsor::ContactPersonName).string())
                    .col(ColumnDef::new(StudentsSponsor::ContactPersonPhone).string())
                    .col(
                        ColumnDef::new(StudentsSponsor::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentsSponsor::Table, StudentsSponsor::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentsEmergency::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentsEmergency::StudentId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentsEmergency::Firstname).string().not_null())
                    .col(ColumnDef::new(StudentsEmergency::Middlename).string())
                    .col(ColumnDef::new(StudentsEmergency::Lastname).string().not_null())
                    .col(ColumnDef::new(StudentsEmergency::Phone).string().not_null())
                    .col(ColumnDef::new(StudentsEmergency::Email).string())
                    .col(ColumnDef::new(StudentsEmergency::IdNumber).string().not_null())
                    .col(ColumnDef::new(StudentsEmergency::Occupation).string())
                    .col(
                        ColumnDef::new(StudentsEmergency::Relationship)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentsEmergency::Residence).string().not_null())
                    .col(ColumnDef::new(StudentsEmergency::Town).string())
                    .col(ColumnDef::new(StudentsEmergency::WorkPlace).string())
                    .col(ColumnDef::new(StudentsEmergency::WorkPhone).string())
                    .col(ColumnDef::new(StudentsEmergency::ProvidedBy).string())
                    .col(
                        ColumnDef::new(StudentsEmergency::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentsEmergency::Table, StudentsEmergency::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentsGuardians::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentsGuardians::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentsGuardians::StudentId).uuid().not_null())
                    .col(ColumnDef::new(StudentsGuardians::Title).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::Firstname).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::Middlename).string())
                    .col(ColumnDef::new(StudentsGuardians::Lastname).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::Phone).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::PhoneAlternate).string())
                    .col(ColumnDef::new(StudentsGuardians::Email).string())
                    .col(ColumnDef::new(StudentsGuardians::IdNumber).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::KraPinNo).string())
                    .col(ColumnDef::new(StudentsGuardians::PassportNo).string())
                    .col(ColumnDef::new(StudentsGuardians::AlienNo).string())
                    .col(ColumnDef::new(StudentsGuardians::Occupation).string())
                    .col(ColumnDef::new(StudentsGuardians::WorkLocation).string())
                    .col(ColumnDef::new(StudentsGuardians::WorkPhone).string())
                    .col(
                        ColumnDef::new(StudentsGuardians::Relationship)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentsGuardians::Address).string())
                    .col(ColumnDef::new(StudentsGuardians::Residence).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::Town).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::County).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::SubCounty).string().not_null())
                    .col(ColumnDef::new(StudentsGuardians::Ward).string())
                    .col(ColumnDef::new(StudentsGuardians::VotersCardNo).string())
                    .col(ColumnDef::new(StudentsGuardians::PollingStation).string())
                    .col(
                        ColumnDef::new(StudentsGuardians::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentsGuardians::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentsGuardians::Table, StudentsGuardians::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(StudentsGuardians::Table)
                    .col(StudentsGuardians::StudentId)
                    .name("idx_students_guardians_student_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentsGuardians::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentsEmergency::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentsSponsor::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StudentsSponsor {
    Table,
    StudentId,
    Name,
    SponsorshipType,
    SponsorshipNature,
    Phone,
    Email,
    Address,
    ContactPersonName,
    ContactPersonPhone,
    UpdatedAt,
}

#[derive(Iden)]
enum StudentsEmergency {
    Table,
    StudentId,
    Firstname,
    Middlename,
    Lastname,
    Phone,
    Email,
    IdNumber,
    Occupation,
    Relationship,
    Residence,
    Town,
    WorkPlace,
    WorkPhone,
    ProvidedBy,
    UpdatedAt,
}

#[derive(Iden)]
enum StudentsGuardians {
    Table,
    Id,
    StudentId,
    Title,
    Firstname,
    Middlename,
    Lastname,
    Phone,
    PhoneAlternate,
    Email,
    IdNumber,
    KraPinNo,
    PassportNo,
    AlienNo,
    Occupation,
    WorkLocation,
    WorkPhone,
    Relationship,
    Address,
    Residence,
    Town,
    County,
    SubCounty,
    Ward,
    VotersCardNo,
    PollingStation,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
}

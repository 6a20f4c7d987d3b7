pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_roles;
mod m20260301_000002_create_system_users;
mod m20260301_000003_create_students;
mod m20260301_000004_create_invitations;
mod m20260301_000005_create_bursaries;
mod m20260301_000006_create_applications;
mod m20260301_000007_create_student_profiles;
mod m20260301_000008_create_student_contacts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_roles::Migration),
            Box::new(m20260301_000002_create_system_users::Migration),
            Box::new(m20260301_000003_create_students::Migration),
            Box::new(m20260301_000004_create_invitations::Migration),
            Box::new(m20260301_000005_create_bursaries::Migration),
            Box::new(m20260301_000006_create_applications::Migration),
            Box::new(m20260301_000007_create_student_profiles::Migration),
            Box::new(m20260301_000008_create_student_contacts::Migration),
        ]
    }
}

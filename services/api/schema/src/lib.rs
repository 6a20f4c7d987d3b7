pub mod admins_invitations;
pub mod applications;
pub mod bursaries;
pub mod roles;
pub mod students;
pub mod students_emergency;
pub mod students_guardians;
pub mod students_institution;
pub mod students_invitations;
pub mod students_personal;
pub mod students_sponsor;
pub mod system_users;

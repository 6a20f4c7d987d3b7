#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use bursary_domain::access::RoleLevel;
use bursary_domain::pagination::PageRequest;
use bursary_domain::principal::PrincipalKind;
use bursary_domain::stage::Stage;

use crate::domain::types::{
    Application, ApplicationDetails, Bursary, Invitation, InvitationMail, Principal, Role,
    StudentApplication, StudentEmergencyContact, StudentGuardian, StudentInstitution,
    StudentPersonal, StudentSponsor,
};
use crate::error::ApiError;

/// Seeded roles.
pub trait RoleRepository: Send + Sync {
    /// Case-insensitive lookup by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, ApiError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Role>, ApiError>;

    /// Roles with `level <= max_level`, lowest first.
    async fn list_up_to_level(&self, max_level: RoleLevel) -> Result<Vec<Role>, ApiError>;
}

/// Credential store for one principal kind (admins or students) together with its
/// invitation table.
pub trait PrincipalRepository: Send + Sync {
    fn kind(&self) -> PrincipalKind;

    async fn find_by_email(&self, email: &str) -> Result<Option<Principal>, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, ApiError>;

    /// Insert the principal and its invitation in one transaction.
    /// Fails with `EmailAlreadyExists` if the email is taken.
    async fn create_with_invitation(
        &self,
        principal: &Principal,
        invitation: &Invitation,
    ) -> Result<(), ApiError>;

    /// Delete the principal and the invitation with `token_hash` in one transaction.
    async fn delete_with_invitation(
        &self,
        principal_id: Uuid,
        token_hash: &str,
    ) -> Result<(), ApiError>;

    /// In one transaction: look up the invitation by hash, mark its principal activated
    /// and delete the invitation. Missing or expired (`now > expiry`) invitations fail
    /// with `InvalidToken`. Returns the activated principal's id.
    async fn activate(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Uuid, ApiError>;
}

/// Admin listing, scoped by role level.
pub trait AdminDirectory: Send + Sync {
    /// Admins whose role level is `<= max_level`, newest first.
    async fn list_up_to_level(&self, max_level: RoleLevel) -> Result<Vec<Principal>, ApiError>;
}

/// Applications. Every read excludes withdrawn (soft-deleted) rows.
pub trait ApplicationRepository: Send + Sync {
    /// Fails with `ApplicationAlreadyExists` if the student already has an active
    /// application to the bursary.
    async fn create(&self, application: &Application) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>, ApiError>;

    async fn find_active(
        &self,
        student_id: Uuid,
        bursary_id: Uuid,
    ) -> Result<Option<Application>, ApiError>;

    /// Set `stage = target` only if the row is active and still at `expected`.
    /// Returns `false` if no row matched.
    async fn update_stage(
        &self,
        id: Uuid,
        expected: Stage,
        target: Stage,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError>;

    /// Returns `false` if no active row matched.
    async fn set_remarks(
        &self,
        id: Uuid,
        remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError>;

    /// Soft-delete every active application of the student to the bursary.
    /// Returns the number of rows withdrawn.
    async fn withdraw(
        &self,
        student_id: Uuid,
        bursary_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<u64, ApiError>;

    async fn list_by_stage(&self, stage: Stage) -> Result<Vec<ApplicationDetails>, ApiError>;

    async fn get_details(&self, id: Uuid) -> Result<Option<ApplicationDetails>, ApiError>;

    async fn list_by_student(&self, student_id: Uuid)
    -> Result<Vec<StudentApplication>, ApiError>;
}

pub trait BursaryRepository: Send + Sync {
    async fn create(&self, bursary: &Bursary) -> Result<(), ApiError>;

    /// Returns `false` if no bursary has that id.
    async fn update(&self, bursary: &Bursary) -> Result<bool, ApiError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Bursary>, ApiError>;

    /// Newest first; `search` matches the name case-insensitively. Returns the page and
    /// the total number of matching bursaries.
    async fn list(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> Result<(Vec<Bursary>, u64), ApiError>;
}

pub trait ProfileRepository: Send + Sync {
    async fn get_personal(&self, student_id: Uuid) -> Result<Option<StudentPersonal>, ApiError>;

    async fn upsert_personal(&self, personal: &StudentPersonal) -> Result<(), ApiError>;

    async fn get_institution(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentInstitution>, ApiError>;

    async fn upsert_institution(&self, institution: &StudentInstitution) -> Result<(), ApiError>;

    async fn get_sponsor(&self, student_id: Uuid) -> Result<Option<StudentSponsor>, ApiError>;

    async fn upsert_sponsor(&self, sponsor: &StudentSponsor) -> Result<(), ApiError>;

    /// Returns `false` if the student had no sponsor recorded.
    async fn delete_sponsor(&self, student_id: Uuid) -> Result<bool, ApiError>;

    async fn get_emergency_contact(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentEmergencyContact>, ApiError>;

    async fn upsert_emergency_contact(
        &self,
        contact: &StudentEmergencyContact,
    ) -> Result<(), ApiError>;

    /// Returns `false` if the student had no emergency contact recorded.
    async fn delete_emergency_contact(&self, student_id: Uuid) -> Result<bool, ApiError>;

    /// Oldest first.
    async fn list_guardians(&self, student_id: Uuid) -> Result<Vec<StudentGuardian>, ApiError>;

    async fn create_guardian(&self, guardian: &StudentGuardian) -> Result<(), ApiError>;

    /// Matches on both `guardian.id` and `guardian.student_id`; returns `false` if no
    /// row matched.
    async fn update_guardian(&self, guardian: &StudentGuardian) -> Result<bool, ApiError>;

    /// Returns `false` if the student has no guardian with that id.
    async fn delete_guardian(&self, student_id: Uuid, id: Uuid) -> Result<bool, ApiError>;
}

/// Outbound delivery of activation links.
pub trait Notifier: Send + Sync {
    /// Retries are the implementation's concern; an error means delivery gave up.
    async fn send_invitation(&self, mail: &InvitationMail) -> Result<(), ApiError>;
}

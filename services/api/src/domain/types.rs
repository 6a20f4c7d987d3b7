use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use bursary_domain::access::RoleLevel;
use bursary_domain::bursary::AllocationType;
use bursary_domain::principal::PrincipalKind;
use bursary_domain::stage::Stage;

/// Seeded reference role. `name` is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub level: RoleLevel,
}

/// An admin or student account. Both kinds share the same shape; `role_code` is only
/// ever set for admins.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub kind: PrincipalKind,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    /// bcrypt hash; never leaves the service.
    pub password_hash: String,
    pub blocked: bool,
    pub activated: bool,
    pub first_time_login: bool,
    pub role: Role,
    pub role_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Pending activation. `token_hash` is the SHA-256 hex of the token sent by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invitation {
    pub token_hash: String,
    pub principal_id: Uuid,
    pub expiry: DateTime<Utc>,
}

/// Activation email payload. Carries the plaintext token, which is never persisted.
#[derive(Debug, Clone)]
pub struct InvitationMail {
    pub kind: PrincipalKind,
    pub recipient_name: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bursary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub end_date: NaiveDate,
    pub amount_allocated: Option<f64>,
    pub amount_per_student: Option<f64>,
    pub allocation_type: AllocationType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    pub id: Uuid,
    pub bursary_id: Uuid,
    pub student_id: Uuid,
    pub stage: Stage,
    pub remarks: Option<String>,
    pub soft_delete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSummary {
    pub id: Uuid,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentPersonal {
    pub student_id: Uuid,
    pub dob: NaiveDate,
    pub gender: String,
    pub citizenship: String,
    pub birth_county: String,
    pub birth_sub_county: String,
    pub ward: String,
    pub residence: String,
    pub id_number: Option<String>,
    pub phone: String,
    pub special_need: bool,
    pub special_needs_type: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentInstitution {
    pub student_id: Uuid,
    pub inst_name: String,
    pub inst_type: String,
    pub inst_county: String,
    pub inst_sub_county: String,
    pub principal_name: String,
    pub year_joined: i32,
    pub curr_class_level: String,
    pub adm_no: String,
    pub bank_name: String,
    pub bank_branch: String,
    pub bank_acc_name: String,
    pub bank_acc_no: String,
    pub updated_at: DateTime<Utc>,
}

/// Who funds the student outside the bursary, if anyone. One per student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSponsor {
    pub student_id: Uuid,
    pub name: String,
    pub sponsorship_type: String,
    pub sponsorship_nature: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub contact_person_name: Option<String>,
    pub contact_person_phone: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// One per student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentEmergencyContact {
    pub student_id: Uuid,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub phone: String,
    pub email: Option<String>,
    pub id_number: String,
    pub occupation: Option<String>,
    pub relationship: String,
    pub residence: String,
    pub town: Option<String>,
    pub work_place: Option<String>,
    pub work_phone: Option<String>,
    pub provided_by: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Parent or guardian. A student may record several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentGuardian {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub phone: String,
    pub phone_alternate: Option<String>,
    pub email: Option<String>,
    pub id_number: String,
    pub kra_pin_no: Option<String>,
    pub passport_no: Option<String>,
    pub alien_no: Option<String>,
    pub occupation: Option<String>,
    pub work_location: Option<String>,
    pub work_phone: Option<String>,
    pub relationship: String,
    pub address: Option<String>,
    pub residence: String,
    pub town: String,
    pub county: String,
    pub sub_county: String,
    pub ward: Option<String>,
    pub voters_card_no: Option<String>,
    pub polling_station: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reviewer view of an application with everything needed to decide on it.
#[derive(Debug, Clone)]
pub struct ApplicationDetails {
    pub application: Application,
    pub bursary: Bursary,
    pub student: StudentSummary,
    pub personal: Option<StudentPersonal>,
    pub institution: Option<StudentInstitution>,
}

/// A student's own application paired with the bursary it targets.
#[derive(Debug, Clone)]
pub struct StudentApplication {
    pub application: Application,
    pub bursary: Bursary,
}

/// The authenticated principal a request acts as, loaded fresh from the store.
#[derive(Debug, Clone)]
pub struct Caller {
    pub principal: Principal,
}

impl Caller {
    pub fn id(&self) -> Uuid {
        self.principal.id
    }

    pub fn kind(&self) -> PrincipalKind {
        self.principal.kind
    }

    pub fn level(&self) -> RoleLevel {
        self.principal.role.level
    }

    pub fn role_name(&self) -> &str {
        &self.principal.role.name
    }

    pub fn is_admin(&self) -> bool {
        self.principal.kind == PrincipalKind::Admin
    }

    pub fn is_student(&self) -> bool {
        self.principal.kind == PrincipalKind::Student
    }
}

/// Plaintext invitation token lifetime when not configured (3 days).
pub const DEFAULT_INVITATION_TTL_SECS: i64 = 3 * 24 * 60 * 60;

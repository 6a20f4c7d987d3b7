pub mod admin;
pub mod application;
pub mod auth;
pub mod bursary;
pub mod profile;

use serde::Serialize;
use uuid::Uuid;

use bursary_auth_types::identity::Identity;
use bursary_domain::access::RoleLevel;
use bursary_domain::principal::PrincipalKind;

use crate::domain::types::{Caller, Principal};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::caller::ResolveCallerUseCase;

/// Turn a validated bearer identity into a `Caller` loaded from the store.
pub async fn resolve_caller(state: &AppState, identity: Identity) -> Result<Caller, ApiError> {
    let usecase = ResolveCallerUseCase {
        admins: state.admin_repo(),
        students: state.student_repo(),
    };
    usecase
        .execute(identity.principal_id, identity.kind)
        .await
}

/// Public view of an admin or student. Never carries the password hash.
#[derive(Serialize)]
pub struct PrincipalResponse {
    pub id: Uuid,
    pub kind: PrincipalKind,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub blocked: bool,
    pub activated: bool,
    pub first_time_login: bool,
    pub role: String,
    pub role_level: RoleLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_code: Option<String>,
    #[serde(serialize_with = "bursary_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "bursary_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Principal> for PrincipalResponse {
    fn from(p: Principal) -> Self {
        Self {
            id: p.id,
            kind: p.kind,
            firstname: p.firstname,
            middlename: p.middlename,
            lastname: p.lastname,
            email: p.email,
            blocked: p.blocked,
            activated: p.activated,
            first_time_login: p.first_time_login,
            role: p.role.name,
            role_level: p.role.level,
            role_code: p.role_code,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

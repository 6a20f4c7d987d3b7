use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use bursary_auth_types::token::TokenKeys;
use bursary_domain::workflow::{ApprovalTable, StagePolicy};

use crate::domain::repository::PrincipalRepository;
use crate::infra::db::{
    DbAdminRepository, DbApplicationRepository, DbBursaryRepository, DbProfileRepository,
    DbRoleRepository, DbStudentRepository,
};
use crate::infra::mailer::SendGridNotifier;
use crate::usecase::access::AuthorizationGate;
use crate::usecase::registration::RegisterPrincipalUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Deadline applied to every store call.
    pub query_timeout: Duration,
    pub token_keys: TokenKeys,
    pub approval_table: Arc<ApprovalTable>,
    pub stage_policy: StagePolicy,
    pub invitation_ttl: chrono::Duration,
    pub password_cost: u32,
    pub notifier: SendGridNotifier,
}

impl AppState {
    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
            timeout: self.query_timeout,
        }
    }

    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            db: self.db.clone(),
            timeout: self.query_timeout,
        }
    }

    pub fn student_repo(&self) -> DbStudentRepository {
        DbStudentRepository {
            db: self.db.clone(),
            timeout: self.query_timeout,
        }
    }

    pub fn application_repo(&self) -> DbApplicationRepository {
        DbApplicationRepository {
            db: self.db.clone(),
            timeout: self.query_timeout,
        }
    }

    pub fn bursary_repo(&self) -> DbBursaryRepository {
        DbBursaryRepository {
            db: self.db.clone(),
            timeout: self.query_timeout,
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
            timeout: self.query_timeout,
        }
    }

    pub fn authorization_gate(&self) -> AuthorizationGate<DbRoleRepository> {
        AuthorizationGate {
            roles: self.role_repo(),
        }
    }

    pub fn register_principal<P: PrincipalRepository>(
        &self,
        principals: P,
    ) -> RegisterPrincipalUseCase<P, SendGridNotifier> {
        RegisterPrincipalUseCase {
            principals,
            notifier: self.notifier.clone(),
            invitation_ttl: self.invitation_ttl,
            password_cost: self.password_cost,
        }
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.token_keys.clone()
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

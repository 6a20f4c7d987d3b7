use anyhow::Context as _;
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use bursary_domain::access::is_authorized;
use bursary_domain::principal::STUDENT_ROLE;

use crate::domain::repository::{Notifier, PrincipalRepository, RoleRepository};
use crate::domain::types::{Caller, Invitation, InvitationMail, Principal, Role};
use crate::error::ApiError;
use crate::usecase::saga::{Compensate, Saga};

/// bcrypt ignores everything past 72 bytes.
const MAX_PASSWORD_BYTES: usize = 72;

/// One-way hash under which invitation tokens are stored and looked up.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

fn generate_token() -> String {
    Uuid::new_v4().to_string()
}

pub async fn hash_password(password: String, cost: u32) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("join password hashing task")?
        .context("hash password")?;
    Ok(hash)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Emails are stored and looked up trimmed and lowercased.
pub fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn within_bcrypt_limit(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("length")
            .with_message(format!("password must be at most {MAX_PASSWORD_BYTES} bytes").into()));
    }
    Ok(())
}

// ── RegisterPrincipal ─────────────────────────────────────────────────────────

#[derive(Debug, Validate)]
pub struct RegisterPrincipalInput {
    #[validate(length(min = 1, message = "firstname is required"))]
    pub firstname: String,
    pub middlename: Option<String>,
    #[validate(length(min = 1, message = "lastname is required"))]
    pub lastname: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(
        length(min = 8, message = "password must be at least 8 characters"),
        custom(function = "within_bcrypt_limit")
    )]
    pub password: String,
    pub role: Role,
    pub role_code: Option<String>,
}

impl RegisterPrincipalInput {
    /// Trim names, canonicalise the email and drop blank optional fields.
    /// The password is taken verbatim.
    fn normalized(self) -> Self {
        Self {
            firstname: self.firstname.trim().to_owned(),
            middlename: optional(self.middlename),
            lastname: self.lastname.trim().to_owned(),
            email: canonical_email(&self.email),
            role_code: optional(self.role_code),
            ..self
        }
    }
}

/// Committed registration steps that can be rolled back.
#[derive(Debug)]
pub enum RegistrationStep {
    /// Principal row and invitation row exist.
    Persisted {
        principal_id: Uuid,
        token_hash: String,
    },
}

/// Register a principal and email them a single-use activation token.
///
/// The principal and invitation are written in one transaction. Delivery happens after
/// commit; if it fails both rows are deleted again and the delivery error is returned.
pub struct RegisterPrincipalUseCase<P, N>
where
    P: PrincipalRepository,
    N: Notifier,
{
    pub principals: P,
    pub notifier: N,
    pub invitation_ttl: Duration,
    pub password_cost: u32,
}

impl<P, N> Compensate<RegistrationStep> for RegisterPrincipalUseCase<P, N>
where
    P: PrincipalRepository,
    N: Notifier,
{
    async fn compensate(&self, step: &RegistrationStep) -> Result<(), ApiError> {
        match step {
            RegistrationStep::Persisted {
                principal_id,
                token_hash,
            } => {
                self.principals
                    .delete_with_invitation(*principal_id, token_hash)
                    .await
            }
        }
    }
}

impl<P, N> RegisterPrincipalUseCase<P, N>
where
    P: PrincipalRepository,
    N: Notifier,
{
    pub async fn execute(&self, input: RegisterPrincipalInput) -> Result<Principal, ApiError> {
        let input = input.normalized();
        input.validate()?;

        let password_hash = hash_password(input.password, self.password_cost).await?;
        let now = Utc::now();
        let principal = Principal {
            id: Uuid::now_v7(),
            kind: self.principals.kind(),
            firstname: input.firstname,
            middlename: input.middlename,
            lastname: input.lastname,
            email: input.email,
            password_hash,
            blocked: false,
            activated: false,
            first_time_login: true,
            role: input.role,
            role_code: input.role_code,
            created_at: now,
            updated_at: now,
        };

        let token = generate_token();
        let invitation = Invitation {
            token_hash: hash_token(&token),
            principal_id: principal.id,
            expiry: now + self.invitation_ttl,
        };

        let mut saga = Saga::new("register_principal");
        self.principals
            .create_with_invitation(&principal, &invitation)
            .await?;
        saga.record(RegistrationStep::Persisted {
            principal_id: principal.id,
            token_hash: invitation.token_hash.clone(),
        });

        let mail = InvitationMail {
            kind: principal.kind,
            recipient_name: principal.display_name(),
            email: principal.email.clone(),
            token,
        };
        if let Err(e) = self.notifier.send_invitation(&mail).await {
            let outcome = saga.compensate(self).await;
            warn!(
                principal_id = %principal.id,
                kind = %principal.kind,
                ?outcome,
                "invitation delivery failed, registration rolled back"
            );
            return Err(e);
        }

        info!(principal_id = %principal.id, kind = %principal.kind, "principal registered");
        Ok(principal)
    }
}

// ── RegisterStudent ───────────────────────────────────────────────────────────

pub struct RegisterStudentInput {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

/// Public self-registration; every student gets the seeded student role.
pub struct RegisterStudentUseCase<R, P, N>
where
    R: RoleRepository,
    P: PrincipalRepository,
    N: Notifier,
{
    pub roles: R,
    pub register: RegisterPrincipalUseCase<P, N>,
}

impl<R, P, N> RegisterStudentUseCase<R, P, N>
where
    R: RoleRepository,
    P: PrincipalRepository,
    N: Notifier,
{
    pub async fn execute(&self, input: RegisterStudentInput) -> Result<Principal, ApiError> {
        let role = self
            .roles
            .find_by_name(STUDENT_ROLE)
            .await?
            .ok_or(ApiError::RoleNotFound)?;

        self.register
            .execute(RegisterPrincipalInput {
                firstname: input.firstname,
                middlename: input.middlename,
                lastname: input.lastname,
                email: input.email,
                password: input.password,
                role,
                role_code: None,
            })
            .await
    }
}

// ── RegisterAdmin ─────────────────────────────────────────────────────────────

pub struct RegisterAdminInput {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub role_id: i32,
    pub role_code: Option<String>,
}

/// An admin can only create admins whose role level does not exceed their own.
pub struct RegisterAdminUseCase<R, P, N>
where
    R: RoleRepository,
    P: PrincipalRepository,
    N: Notifier,
{
    pub roles: R,
    pub register: RegisterPrincipalUseCase<P, N>,
}

impl<R, P, N> RegisterAdminUseCase<R, P, N>
where
    R: RoleRepository,
    P: PrincipalRepository,
    N: Notifier,
{
    pub async fn execute(
        &self,
        caller: &Caller,
        input: RegisterAdminInput,
    ) -> Result<Principal, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden);
        }

        let role = self
            .roles
            .find_by_id(input.role_id)
            .await?
            .ok_or(ApiError::RoleNotFound)?;
        if role.name == STUDENT_ROLE {
            return Err(ApiError::InvalidInput(
                "role must be an administrative role".to_owned(),
            ));
        }
        if !is_authorized(caller.level(), role.level) {
            return Err(ApiError::Forbidden);
        }

        self.register
            .execute(RegisterPrincipalInput {
                firstname: input.firstname,
                middlename: input.middlename,
                lastname: input.lastname,
                email: input.email,
                password: input.password,
                role,
                role_code: input.role_code,
            })
            .await
    }
}

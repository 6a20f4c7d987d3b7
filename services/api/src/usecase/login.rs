use anyhow::Context as _;
use validator::Validate;

use bursary_auth_types::token::{TokenKeys, issue_token};

use crate::domain::repository::PrincipalRepository;
use crate::domain::types::Principal;
use crate::error::ApiError;
use crate::usecase::registration::canonical_email;

#[derive(Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub token: String,
    /// Seconds since UNIX epoch.
    pub expires_at: u64,
    pub principal: Principal,
}

pub struct LoginUseCase<P>
where
    P: PrincipalRepository,
{
    pub principals: P,
    pub token_keys: TokenKeys,
}

impl<P> LoginUseCase<P>
where
    P: PrincipalRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        // Malformed and unknown emails are indistinguishable from a wrong password.
        let input = LoginInput {
            email: canonical_email(&input.email),
            ..input
        };
        input.validate().map_err(|_| ApiError::InvalidCredentials)?;
        let principal = self
            .principals
            .find_by_email(&input.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let hash = principal.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(input.password, &hash))
            .await
            .context("join password verification task")?
            .context("verify password")?;
        if !matches {
            return Err(ApiError::InvalidCredentials);
        }

        if principal.blocked {
            return Err(ApiError::AccountBlocked);
        }
        if !principal.activated {
            return Err(ApiError::AccountNotActivated);
        }

        let issued = issue_token(principal.id, principal.kind, &self.token_keys)
            .context("issue bearer token")?;

        Ok(LoginOutput {
            token: issued.token,
            expires_at: issued.exp,
            principal,
        })
    }
}

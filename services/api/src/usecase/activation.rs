use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::PrincipalRepository;
use crate::error::ApiError;
use crate::usecase::registration::hash_token;

/// Redeem an activation token. Single use: a second call with the same token fails with
/// `InvalidToken`, as do unknown and expired tokens.
pub struct ActivatePrincipalUseCase<P>
where
    P: PrincipalRepository,
{
    pub principals: P,
}

impl<P> ActivatePrincipalUseCase<P>
where
    P: PrincipalRepository,
{
    pub async fn execute(&self, token: &str) -> Result<Uuid, ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::InvalidToken);
        }

        let principal_id = self
            .principals
            .activate(&hash_token(token), Utc::now())
            .await?;

        info!(%principal_id, kind = %self.principals.kind(), "principal activated");
        Ok(principal_id)
    }
}

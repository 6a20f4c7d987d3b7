use bursary_domain::access::{RoleLevel, is_authorized, is_authorized_for};

use crate::domain::repository::RoleRepository;
use crate::domain::types::Caller;
use crate::error::ApiError;

/// Level-based authorization gate.
///
/// Resolves a required role name to its level and compares the caller's level against it.
/// This never consults the approval table; who may *approve* is decided by role name in
/// the stage workflow.
pub struct AuthorizationGate<R>
where
    R: RoleRepository,
{
    pub roles: R,
}

impl<R> AuthorizationGate<R>
where
    R: RoleRepository,
{
    async fn required_level(&self, required_role: &str) -> Result<RoleLevel, ApiError> {
        self.roles
            .find_by_name(required_role)
            .await?
            .map(|role| role.level)
            .ok_or(ApiError::RoleNotFound)
    }

    /// `caller_level >= level(required_role)`; `RoleNotFound` if the role does not exist.
    pub async fn is_authorized(
        &self,
        caller_level: RoleLevel,
        required_role: &str,
    ) -> Result<bool, ApiError> {
        let required = self.required_level(required_role).await?;
        Ok(is_authorized(caller_level, required))
    }

    /// Fail with `Forbidden` unless the caller owns the resource or reaches `required_role`.
    /// Ownership is checked before the level comparison.
    pub async fn authorize(
        &self,
        caller: &Caller,
        required_role: &str,
        is_owner: bool,
    ) -> Result<(), ApiError> {
        let required = self.required_level(required_role).await?;
        if is_authorized_for(caller.level(), required, is_owner) {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

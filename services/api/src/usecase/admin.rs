use crate::domain::repository::{AdminDirectory, RoleRepository};
use crate::domain::types::{Caller, Principal, Role};
use crate::error::ApiError;

// ── ListAdmins ────────────────────────────────────────────────────────────────

/// Admins visible to the caller: those whose role level does not exceed the caller's.
pub struct ListAdminsUseCase<P>
where
    P: AdminDirectory,
{
    pub admins: P,
}

impl<P> ListAdminsUseCase<P>
where
    P: AdminDirectory,
{
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Principal>, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden);
        }
        self.admins.list_up_to_level(caller.level()).await
    }
}

// ── ListRoles ─────────────────────────────────────────────────────────────────

pub struct ListRolesUseCase<R>
where
    R: RoleRepository,
{
    pub roles: R,
}

impl<R> ListRolesUseCase<R>
where
    R: RoleRepository,
{
    pub async fn execute(&self, caller: &Caller) -> Result<Vec<Role>, ApiError> {
        if !caller.is_admin() {
            return Err(ApiError::Forbidden);
        }
        self.roles.list_up_to_level(caller.level()).await
    }
}

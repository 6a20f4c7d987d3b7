use uuid::Uuid;

use bursary_domain::principal::PrincipalKind;

use crate::domain::repository::PrincipalRepository;
use crate::domain::types::Caller;
use crate::error::ApiError;

/// Load the principal behind a validated bearer token.
///
/// The token only proves who the caller was when it was issued; blocking an account or
/// changing its role takes effect on the next request.
pub struct ResolveCallerUseCase<A, S>
where
    A: PrincipalRepository,
    S: PrincipalRepository,
{
    pub admins: A,
    pub students: S,
}

impl<A, S> ResolveCallerUseCase<A, S>
where
    A: PrincipalRepository,
    S: PrincipalRepository,
{
    pub async fn execute(&self, principal_id: Uuid, kind: PrincipalKind) -> Result<Caller, ApiError> {
        let principal = match kind {
            PrincipalKind::Admin => self.admins.find_by_id(principal_id).await?,
            PrincipalKind::Student => self.students.find_by_id(principal_id).await?,
        }
        .ok_or(ApiError::Unauthorized)?;

        if principal.blocked {
            return Err(ApiError::AccountBlocked);
        }
        if !principal.activated {
            return Err(ApiError::AccountNotActivated);
        }
        Ok(Caller { principal })
    }
}

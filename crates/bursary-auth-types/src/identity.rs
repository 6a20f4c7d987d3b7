//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::headers::HeaderMapExt as _;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use bursary_domain::principal::PrincipalKind;

use crate::token::{TokenKeys, validate_token};

/// Authenticated principal resolved from `Authorization: Bearer <jwt>`.
///
/// Returns 401 if the header is absent, not a bearer credential, or fails validation.
/// Whether the principal may perform the request is decided by the usecases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub principal_id: Uuid,
    pub kind: PrincipalKind,
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().trim().to_owned())
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for Identity
where
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // Resolve synchronously and hand back a 'static future; axum-core declares this
    // method as `fn -> impl Future + Send`, which `async fn` cannot satisfy here.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let keys = TokenKeys::from_ref(state);
        let result = match bearer_token(parts) {
            None => Err(StatusCode::UNAUTHORIZED),
            Some(token) => validate_token(&token, &keys)
                .map(|info| Self {
                    principal_id: info.principal_id,
                    kind: info.kind,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "rejected bearer token");
                    StatusCode::UNAUTHORIZED
                }),
        };

        async move { result }
    }
}

//! JWT bearer-token issue and validation.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bursary_domain::principal::PrincipalKind;

/// Signing material for bearer tokens. Cheap to clone; lives in service state.
#[derive(Debug, Clone)]
pub struct TokenKeys {
    pub secret: String,
    pub issuer: String,
    /// Lifetime of issued tokens in seconds.
    pub ttl_secs: u64,
}

/// Principal identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub principal_id: Uuid,
    pub kind: PrincipalKind,
    pub exp: u64,
}

/// A freshly signed token and its expiry (seconds since UNIX epoch).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | principal ID (UUID string) |
/// | `kind` | custom | `admin` or `student` |
/// | `iss` | `iss` | issuing service |
/// | `exp` | `exp` | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub kind: PrincipalKind,
    pub iss: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn issue_token(
    principal_id: Uuid,
    kind: PrincipalKind,
    keys: &TokenKeys,
) -> Result<IssuedToken, AuthError> {
    let exp = now_secs() + keys.ttl_secs;
    let claims = JwtClaims {
        sub: principal_id.to_string(),
        kind,
        iss: keys.issuer.clone(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(keys.secret.as_bytes()),
    )
    .map_err(AuthError::Signing)?;
    Ok(IssuedToken { token, exp })
}

/// Validation: HS256, `exp` checked with the default 60s leeway, `iss` must match,
/// required claims `exp` + `sub`.
pub fn validate_token(token: &str, keys: &TokenKeys) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation.set_issuer(&[keys.issuer.as_str()]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(keys.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    let principal_id = data
        .claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(TokenInfo {
        principal_id,
        kind: data.claims.kind,
        exp: data.claims.exp,
    })
}

//! Mock auth helpers for integration tests.
//!
//! `MockAuth` signs a real bearer token with the test keys so requests pass the
//! `Identity` extractor without going through login.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use bursary_auth_types::token::{TokenKeys, issue_token};
use bursary_domain::principal::PrincipalKind;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";
pub const TEST_JWT_ISSUER: &str = "bursary-test";

pub fn test_token_keys() -> TokenKeys {
    TokenKeys {
        secret: TEST_JWT_SECRET.to_owned(),
        issuer: TEST_JWT_ISSUER.to_owned(),
        ttl_secs: 3600,
    }
}

/// Identity to authenticate test requests as.
pub struct MockAuth {
    pub principal_id: Uuid,
    pub kind: PrincipalKind,
}

impl MockAuth {
    pub fn admin(principal_id: Uuid) -> Self {
        Self {
            principal_id,
            kind: PrincipalKind::Admin,
        }
    }

    pub fn student(principal_id: Uuid) -> Self {
        Self {
            principal_id,
            kind: PrincipalKind::Student,
        }
    }

    /// `Bearer <jwt>` signed with [`test_token_keys`].
    pub fn bearer(&self) -> String {
        let issued = issue_token(self.principal_id, self.kind, &test_token_keys())
            .expect("sign test token");
        format!("Bearer {}", issued.token)
    }

    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.bearer()).expect("valid header value"),
        );
        map
    }
}

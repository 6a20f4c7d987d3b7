use bursary_api::error::ApiError;
use bursary_api::usecase::login::{LoginInput, LoginUseCase};
use bursary_auth_types::token::validate_token;
use bursary_domain::principal::PrincipalKind;
use bursary_testing::auth::test_token_keys;

use crate::helpers::{MockPrincipalRepo, TEST_PASSWORD, admin_principal, student_principal};

fn input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_token_for_valid_credentials() {
    let student = student_principal("achieng@example.com");
    let uc = LoginUseCase {
        principals: MockPrincipalRepo::students(vec![student.clone()]),
        token_keys: test_token_keys(),
    };

    let output = uc
        .execute(input("Achieng@Example.com", TEST_PASSWORD))
        .await
        .unwrap();

    assert_eq!(output.principal.id, student.id);
    let info = validate_token(&output.token, &test_token_keys()).unwrap();
    assert_eq!(info.principal_id, student.id);
    assert_eq!(info.kind, PrincipalKind::Student);
    assert_eq!(info.exp, output.expires_at);
}

#[tokio::test]
async fn should_not_distinguish_unknown_email_from_wrong_password() {
    let admin = admin_principal("county");
    let email = admin.email.clone();
    let uc = LoginUseCase {
        principals: MockPrincipalRepo::admins(vec![admin]),
        token_keys: test_token_keys(),
    };

    for (email, password) in [
        (email.as_str(), "wrong-password"),
        ("nobody@example.com", TEST_PASSWORD),
        ("not-an-email", TEST_PASSWORD),
    ] {
        let result = uc.execute(input(email, password)).await;
        assert!(
            matches!(result, Err(ApiError::InvalidCredentials)),
            "expected InvalidCredentials for {email}, got {:?}",
            result.map(|o| o.principal.id)
        );
    }
}

#[tokio::test]
async fn should_refuse_blocked_and_unactivated_accounts() {
    let mut blocked = student_principal("blocked@example.com");
    blocked.blocked = true;
    let mut pending = student_principal("pending@example.com");
    pending.activated = false;
    let uc = LoginUseCase {
        principals: MockPrincipalRepo::students(vec![blocked, pending]),
        token_keys: test_token_keys(),
    };

    let result = uc
        .execute(input("blocked@example.com", TEST_PASSWORD))
        .await;
    assert!(
        matches!(result, Err(ApiError::AccountBlocked)),
        "expected AccountBlocked, got {:?}",
        result.map(|o| o.principal.id)
    );

    let result = uc
        .execute(input("pending@example.com", TEST_PASSWORD))
        .await;
    assert!(
        matches!(result, Err(ApiError::AccountNotActivated)),
        "expected AccountNotActivated, got {:?}",
        result.map(|o| o.principal.id)
    );
}

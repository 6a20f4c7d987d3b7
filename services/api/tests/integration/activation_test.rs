use chrono::Duration;

use bursary_api::error::ApiError;
use bursary_api::usecase::activation::ActivatePrincipalUseCase;
use bursary_api::usecase::registration::{
    RegisterPrincipalUseCase, RegisterStudentInput, RegisterStudentUseCase,
};

use crate::helpers::{
    MockNotifier, MockPrincipalRepo, MockRoleRepo, TEST_BCRYPT_COST, TEST_PASSWORD,
};

/// Register a student and return the repository plus the emailed plaintext token.
async fn registered_student(invitation_ttl: Duration) -> (MockPrincipalRepo, String) {
    let repo = MockPrincipalRepo::students(vec![]);
    let notifier = MockNotifier::ok();
    let sent = notifier.sent_handle();

    let uc = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: RegisterPrincipalUseCase {
            principals: repo.share(),
            notifier,
            invitation_ttl,
            password_cost: TEST_BCRYPT_COST,
        },
    };
    uc.execute(RegisterStudentInput {
        firstname: "Achieng".to_owned(),
        middlename: None,
        lastname: "Mwangi".to_owned(),
        email: "achieng@example.com".to_owned(),
        password: TEST_PASSWORD.to_owned(),
    })
    .await
    .unwrap();

    let token = sent.lock().unwrap()[0].token.clone();
    (repo, token)
}

#[tokio::test]
async fn should_activate_exactly_once() {
    let (repo, token) = registered_student(Duration::days(3)).await;
    let store = repo.store_handle();
    let uc = ActivatePrincipalUseCase { principals: repo };

    let id = uc.execute(&token).await.unwrap();
    {
        let store = store.lock().unwrap();
        let student = store.principals.iter().find(|p| p.id == id).unwrap();
        assert!(student.activated, "principal should be activated");
        assert!(student.first_time_login);
        assert!(store.invitations.is_empty(), "invitation must be consumed");
    }

    let second = uc.execute(&token).await;
    assert!(
        matches!(second, Err(ApiError::InvalidToken)),
        "expected InvalidToken on reuse, got {second:?}"
    );
}

#[tokio::test]
async fn should_reject_expired_token_and_leave_principal_inactive() {
    let (repo, token) = registered_student(Duration::seconds(-1)).await;
    let store = repo.store_handle();
    let uc = ActivatePrincipalUseCase { principals: repo };

    let result = uc.execute(&token).await;

    assert!(
        matches!(result, Err(ApiError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
    let store = store.lock().unwrap();
    assert!(!store.principals[0].activated, "principal must stay inactive");
}

#[tokio::test]
async fn should_reject_unknown_and_empty_tokens() {
    let (repo, _token) = registered_student(Duration::days(3)).await;
    let uc = ActivatePrincipalUseCase { principals: repo };

    for token in ["not-a-real-token", ""] {
        let result = uc.execute(token).await;
        assert!(
            matches!(result, Err(ApiError::InvalidToken)),
            "expected InvalidToken for {token:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_not_accept_stored_hash_as_token() {
    let (repo, _token) = registered_student(Duration::days(3)).await;
    let stored_hash = repo.store_handle().lock().unwrap().invitations[0]
        .token_hash
        .clone();
    let uc = ActivatePrincipalUseCase { principals: repo };

    let result = uc.execute(&stored_hash).await;
    assert!(
        matches!(result, Err(ApiError::InvalidToken)),
        "expected InvalidToken, got {result:?}"
    );
}

use chrono::Duration;

use bursary_api::error::ApiError;
use bursary_api::usecase::registration::{
    RegisterAdminInput, RegisterAdminUseCase, RegisterPrincipalUseCase, RegisterStudentInput,
    RegisterStudentUseCase, hash_token,
};
use bursary_domain::principal::PrincipalKind;

use crate::helpers::{
    MockNotifier, MockPrincipalRepo, MockRoleRepo, TEST_BCRYPT_COST, TEST_PASSWORD, admin,
    seeded_role,
};

fn register(
    principals: MockPrincipalRepo,
    notifier: MockNotifier,
) -> RegisterPrincipalUseCase<MockPrincipalRepo, MockNotifier> {
    RegisterPrincipalUseCase {
        principals,
        notifier,
        invitation_ttl: Duration::days(3),
        password_cost: TEST_BCRYPT_COST,
    }
}

fn student_input(email: &str) -> RegisterStudentInput {
    RegisterStudentInput {
        firstname: "Wanjiru".to_owned(),
        middlename: None,
        lastname: "Kamau".to_owned(),
        email: email.to_owned(),
        password: TEST_PASSWORD.to_owned(),
    }
}

fn admin_input(role_id: i32) -> RegisterAdminInput {
    RegisterAdminInput {
        firstname: "Otieno".to_owned(),
        middlename: Some("J".to_owned()),
        lastname: "Odhiambo".to_owned(),
        email: "officer@county.example.com".to_owned(),
        password: TEST_PASSWORD.to_owned(),
        role_id,
        role_code: Some("CTY-01".to_owned()),
    }
}

#[tokio::test]
async fn should_register_student_pending_activation_and_send_token() {
    let repo = MockPrincipalRepo::students(vec![]);
    let store = repo.store_handle();
    let notifier = MockNotifier::ok();
    let sent = notifier.sent_handle();

    let uc = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, notifier),
    };
    let student = uc
        .execute(student_input("  Wanjiru@Example.com "))
        .await
        .unwrap();

    assert_eq!(student.kind, PrincipalKind::Student);
    assert_eq!(student.email, "wanjiru@example.com");
    assert_eq!(student.role.name, "student");
    assert!(!student.activated, "new principal must await activation");
    assert_ne!(student.password_hash, TEST_PASSWORD);

    let mails = sent.lock().unwrap();
    assert_eq!(mails.len(), 1, "expected exactly one invitation mail");
    let mail = &mails[0];
    assert_eq!(mail.email, "wanjiru@example.com");
    assert_eq!(mail.kind, PrincipalKind::Student);

    let store = store.lock().unwrap();
    assert_eq!(store.principals.len(), 1);
    assert_eq!(store.invitations.len(), 1);
    let invitation = &store.invitations[0];
    assert_eq!(invitation.principal_id, student.id);
    assert_eq!(invitation.token_hash, hash_token(&mail.token));
    assert_ne!(
        invitation.token_hash, mail.token,
        "plaintext token must not be stored"
    );
}

#[tokio::test]
async fn should_roll_back_principal_and_invitation_when_notification_fails() {
    let repo = MockPrincipalRepo::students(vec![]);
    let store = repo.store_handle();

    let uc = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, MockNotifier::failing()),
    };
    let result = uc.execute(student_input("wanjiru@example.com")).await;

    assert!(
        matches!(result, Err(ApiError::NotificationFailed(_))),
        "expected NotificationFailed, got {result:?}"
    );
    let store = store.lock().unwrap();
    assert!(store.principals.is_empty(), "principal row must be rolled back");
    assert!(store.invitations.is_empty(), "invitation row must be rolled back");
}

#[tokio::test]
async fn should_allow_reregistration_after_rollback() {
    let repo = MockPrincipalRepo::students(vec![]);
    let shared = repo.share();

    let failing = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, MockNotifier::failing()),
    };
    assert!(failing.execute(student_input("wanjiru@example.com")).await.is_err());

    let working = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(shared, MockNotifier::ok()),
    };
    let result = working.execute(student_input("wanjiru@example.com")).await;
    assert!(result.is_ok(), "expected success after rollback, got {result:?}");
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let repo = MockPrincipalRepo::students(vec![]);
    let notifier = MockNotifier::ok();
    let sent = notifier.sent_handle();

    let uc = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, notifier),
    };
    uc.execute(student_input("wanjiru@example.com"))
        .await
        .unwrap();
    let result = uc.execute(student_input("WANJIRU@example.com")).await;

    assert!(
        matches!(result, Err(ApiError::EmailAlreadyExists)),
        "expected EmailAlreadyExists, got {result:?}"
    );
    assert_eq!(sent.lock().unwrap().len(), 1, "no mail for the duplicate");
}

#[tokio::test]
async fn should_reject_short_password_before_persisting() {
    let repo = MockPrincipalRepo::students(vec![]);
    let store = repo.store_handle();

    let uc = RegisterStudentUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, MockNotifier::ok()),
    };
    let mut input = student_input("wanjiru@example.com");
    input.password = "short".to_owned();
    let result = uc.execute(input).await;

    assert!(
        matches!(result, Err(ApiError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
    assert!(store.lock().unwrap().principals.is_empty());
}

#[tokio::test]
async fn should_fail_when_student_role_is_not_seeded() {
    let uc = RegisterStudentUseCase {
        roles: MockRoleRepo::new(vec![]),
        register: register(MockPrincipalRepo::students(vec![]), MockNotifier::ok()),
    };
    let result = uc.execute(student_input("wanjiru@example.com")).await;
    assert!(
        matches!(result, Err(ApiError::RoleNotFound)),
        "expected RoleNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_let_super_admin_register_county_admin() {
    let repo = MockPrincipalRepo::admins(vec![]);
    let uc = RegisterAdminUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, MockNotifier::ok()),
    };

    let county = seeded_role("county");
    let created = uc
        .execute(&admin("super-admin"), admin_input(county.id))
        .await
        .unwrap();

    assert_eq!(created.kind, PrincipalKind::Admin);
    assert_eq!(created.role, county);
    assert_eq!(created.role_code.as_deref(), Some("CTY-01"));
}

#[tokio::test]
async fn should_forbid_registering_more_powerful_admin() {
    let repo = MockPrincipalRepo::admins(vec![]);
    let store = repo.store_handle();
    let uc = RegisterAdminUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(repo, MockNotifier::ok()),
    };

    let finance = seeded_role("finance");
    let result = uc.execute(&admin("ward"), admin_input(finance.id)).await;

    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
    assert!(store.lock().unwrap().principals.is_empty());
}

#[tokio::test]
async fn should_reject_student_role_for_admin() {
    let uc = RegisterAdminUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(MockPrincipalRepo::admins(vec![]), MockNotifier::ok()),
    };
    let student_role = seeded_role("student");
    let result = uc
        .execute(&admin("super-admin"), admin_input(student_role.id))
        .await;
    assert!(
        matches!(result, Err(ApiError::InvalidInput(_))),
        "expected InvalidInput, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_role_not_found_for_unknown_role_id() {
    let uc = RegisterAdminUseCase {
        roles: MockRoleRepo::seeded(),
        register: register(MockPrincipalRepo::admins(vec![]), MockNotifier::ok()),
    };
    let result = uc.execute(&admin("super-admin"), admin_input(99)).await;
    assert!(
        matches!(result, Err(ApiError::RoleNotFound)),
        "expected RoleNotFound, got {result:?}"
    );
}

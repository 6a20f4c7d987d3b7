use std::sync::Arc;

use uuid::Uuid;

use bursary_api::domain::types::{Caller, Principal};
use bursary_api::error::ApiError;
use bursary_api::usecase::application::{
    CreateApplicationUseCase, GetApplicationDetailsUseCase, ListReviewQueueUseCase,
    ListStudentApplicationsUseCase, WithdrawApplicationUseCase,
};
use bursary_api::usecase::access::AuthorizationGate;
use bursary_domain::bursary::AllocationType;
use bursary_domain::stage::Stage;
use bursary_domain::workflow::ApprovalTable;

use crate::helpers::{
    MockApplicationRepo, MockBursaryRepo, MockRoleRepo, admin, admin_principal, application,
    bursary, role, student, student_principal,
};

#[tokio::test]
async fn should_submit_application_at_submitted_stage() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let applicant = student();
    let repo = MockApplicationRepo::new(vec![]);
    let handle = repo.applications_handle();
    let uc = CreateApplicationUseCase {
        applications: repo,
        bursaries: MockBursaryRepo::new(vec![form1.clone()]),
    };

    let created = uc.execute(&applicant, form1.id).await.unwrap();

    assert_eq!(created.stage, Stage::Submitted);
    assert_eq!(created.student_id, applicant.id());
    assert!(!created.soft_delete);
    assert_eq!(handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_second_active_application_to_same_bursary() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let applicant = student();
    let uc = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![]),
        bursaries: MockBursaryRepo::new(vec![form1.clone()]),
    };

    uc.execute(&applicant, form1.id).await.unwrap();
    let second = uc.execute(&applicant, form1.id).await;

    assert!(
        matches!(second, Err(ApiError::ApplicationAlreadyExists)),
        "expected ApplicationAlreadyExists, got {second:?}"
    );
}

#[tokio::test]
async fn should_allow_reapplying_after_withdrawal() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let applicant = student();
    let repo = MockApplicationRepo::new(vec![]);
    let handle = repo.applications_handle();
    let create = CreateApplicationUseCase {
        applications: repo,
        bursaries: MockBursaryRepo::new(vec![form1.clone()]),
    };
    create.execute(&applicant, form1.id).await.unwrap();

    let withdraw = WithdrawApplicationUseCase {
        applications: MockApplicationRepo {
            applications: Arc::clone(&handle),
            bursaries: vec![],
            students: vec![],
            concurrent_stage: None,
        },
    };
    assert_eq!(withdraw.execute(&applicant, form1.id).await.unwrap(), 1);

    let again = create.execute(&applicant, form1.id).await;
    assert!(again.is_ok(), "expected a fresh application, got {again:?}");
    assert_eq!(handle.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn should_return_bursary_not_found_for_unknown_bursary() {
    let uc = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![]),
        bursaries: MockBursaryRepo::new(vec![]),
    };

    let result = uc.execute(&student(), Uuid::now_v7()).await;
    assert!(
        matches!(result, Err(ApiError::BursaryNotFound)),
        "expected BursaryNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_forbid_admin_from_applying() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let uc = CreateApplicationUseCase {
        applications: MockApplicationRepo::new(vec![]),
        bursaries: MockBursaryRepo::new(vec![form1.clone()]),
    };

    let result = uc.execute(&admin("ward"), form1.id).await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_when_nothing_to_withdraw() {
    let uc = WithdrawApplicationUseCase {
        applications: MockApplicationRepo::new(vec![]),
    };

    let result = uc.execute(&student(), Uuid::now_v7()).await;
    assert!(
        matches!(result, Err(ApiError::ApplicationNotFound)),
        "expected ApplicationNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_never_list_withdrawn_applications() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let owner = student_principal("owner@example.com");
    let active = application(owner.id, form1.id, Stage::Submitted);
    let mut withdrawn = application(owner.id, form1.id, Stage::Submitted);
    withdrawn.soft_delete = true;

    let repo = MockApplicationRepo::new(vec![active.clone(), withdrawn])
        .with_bursaries(vec![form1.clone()])
        .with_students(vec![&owner]);
    let queue = ListReviewQueueUseCase {
        applications: repo,
        table: Arc::new(ApprovalTable::standard()),
    };

    let listed = queue.execute(&admin("ward")).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].application.id, active.id);

    let mine = ListStudentApplicationsUseCase {
        applications: queue.applications,
    };
    let caller = Caller { principal: owner };
    let own = mine.execute(&caller).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].bursary.name, "Form1 Aid");
}

#[tokio::test]
async fn should_show_each_reviewer_their_predecessor_stage() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let owner = student_principal("owner@example.com");
    let at_submitted = application(owner.id, form1.id, Stage::Submitted);
    let at_county = application(owner.id, Uuid::now_v7(), Stage::County);
    let repo = MockApplicationRepo::new(vec![at_submitted.clone(), at_county.clone()])
        .with_bursaries(vec![
            form1.clone(),
            bursary_with_id(at_county.bursary_id),
        ])
        .with_students(vec![&owner]);
    let queue = ListReviewQueueUseCase {
        applications: repo,
        table: Arc::new(ApprovalTable::standard()),
    };

    let ward = queue.execute(&admin("ward")).await.unwrap();
    assert_eq!(ward.len(), 1);
    assert_eq!(ward[0].application.id, at_submitted.id);

    let county = queue.execute(&admin("county")).await.unwrap();
    assert_eq!(county.len(), 1);
    assert_eq!(county[0].application.id, at_county.id);

    let super_admin = queue.execute(&admin("super-admin")).await.unwrap();
    assert!(super_admin.is_empty(), "unmapped roles review nothing");
}

fn bursary_with_id(id: Uuid) -> bursary_api::domain::types::Bursary {
    let mut b = bursary("Tertiary Aid", AllocationType::Variable, None);
    b.id = id;
    b
}

#[tokio::test]
async fn should_let_owner_and_ward_read_details_but_not_other_students() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let owner = student_principal("owner@example.com");
    let app = application(owner.id, form1.id, Stage::Submitted);
    let uc = GetApplicationDetailsUseCase {
        applications: MockApplicationRepo::new(vec![app.clone()])
            .with_bursaries(vec![form1])
            .with_students(vec![&owner]),
        gate: AuthorizationGate {
            roles: MockRoleRepo::seeded(),
        },
    };

    let as_owner = uc.execute(&Caller { principal: owner.clone() }, app.id).await;
    assert!(as_owner.is_ok(), "owner should read, got {as_owner:?}");

    let as_ward = uc.execute(&admin("ward"), app.id).await;
    assert!(as_ward.is_ok(), "ward should read, got {as_ward:?}");

    let other = Caller {
        principal: student_principal("other@example.com"),
    };
    let as_other = uc.execute(&other, app.id).await;
    assert!(
        matches!(as_other, Err(ApiError::ApplicationNotFound)),
        "expected ApplicationNotFound, got {as_other:?}"
    );

    let missing = uc.execute(&admin("ward"), Uuid::now_v7()).await;
    assert!(
        matches!(missing, Err(ApiError::ApplicationNotFound)),
        "expected ApplicationNotFound, got {missing:?}"
    );
}

#[tokio::test]
async fn should_not_reveal_whether_another_students_application_exists() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let owner = student_principal("owner@example.com");
    let app = application(owner.id, form1.id, Stage::County);
    let uc = GetApplicationDetailsUseCase {
        applications: MockApplicationRepo::new(vec![app.clone()])
            .with_bursaries(vec![form1])
            .with_students(vec![&owner]),
        gate: AuthorizationGate {
            roles: MockRoleRepo::seeded(),
        },
    };
    let other = Caller {
        principal: student_principal("other@example.com"),
    };

    let existing = uc.execute(&other, app.id).await.unwrap_err();
    let missing = uc.execute(&other, Uuid::now_v7()).await.unwrap_err();

    assert!(matches!(existing, ApiError::ApplicationNotFound));
    assert!(matches!(missing, ApiError::ApplicationNotFound));
    assert_eq!(existing.status(), missing.status());
}

#[tokio::test]
async fn should_check_admin_level_before_looking_up_application() {
    let uc = GetApplicationDetailsUseCase {
        applications: MockApplicationRepo::new(vec![]),
        gate: AuthorizationGate {
            roles: MockRoleRepo::seeded(),
        },
    };
    let below_ward = Caller {
        principal: Principal {
            role: role(99, "clerk", 0),
            ..admin_principal("ward")
        },
    };

    let result = uc.execute(&below_ward, Uuid::now_v7()).await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

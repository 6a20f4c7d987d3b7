use chrono::NaiveDate;
use uuid::Uuid;

use bursary_api::error::ApiError;
use bursary_api::usecase::access::AuthorizationGate;
use bursary_api::usecase::bursary::{
    BursaryInput, CreateBursaryUseCase, GetBursaryForStudentUseCase, ListBursariesUseCase,
    UpdateBursaryUseCase,
};
use bursary_domain::bursary::AllocationType;
use bursary_domain::pagination::PageRequest;
use bursary_domain::stage::Stage;

use crate::helpers::{
    MockApplicationRepo, MockBursaryRepo, MockRoleRepo, admin, application, bursary, student,
};

fn form1_input() -> BursaryInput {
    BursaryInput {
        name: " Form1 Aid ".to_owned(),
        description: Some("First-year secondary school fees".to_owned()),
        end_date: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
        amount_allocated: Some(2_500_000.0),
        amount_per_student: Some(5000.0),
        allocation_type: AllocationType::Fixed,
    }
}

fn create_uc(repo: MockBursaryRepo) -> CreateBursaryUseCase<MockBursaryRepo, MockRoleRepo> {
    CreateBursaryUseCase {
        bursaries: repo,
        gate: AuthorizationGate {
            roles: MockRoleRepo::seeded(),
        },
    }
}

#[tokio::test]
async fn should_create_bursary_as_county_admin() {
    let repo = MockBursaryRepo::new(vec![]);
    let handle = repo.bursaries_handle();

    let created = create_uc(repo)
        .execute(&admin("county"), form1_input())
        .await
        .unwrap();

    assert_eq!(created.name, "Form1 Aid");
    assert_eq!(created.amount_per_student, Some(5000.0));
    assert_eq!(handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_forbid_bursary_creation_below_county() {
    let repo = MockBursaryRepo::new(vec![]);
    let handle = repo.bursaries_handle();
    let uc = create_uc(repo);

    for caller in [admin("ward"), student()] {
        let result = uc.execute(&caller, form1_input()).await;
        assert!(
            matches!(result, Err(ApiError::Forbidden)),
            "expected Forbidden for {}, got {result:?}",
            caller.role_name()
        );
    }
    assert!(handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_validate_bursary_fields() {
    let uc = create_uc(MockBursaryRepo::new(vec![]));

    let mut no_name = form1_input();
    no_name.name = "   ".to_owned();
    let mut negative = form1_input();
    negative.amount_allocated = Some(-1.0);
    let mut fixed_without_amount = form1_input();
    fixed_without_amount.amount_per_student = None;

    for input in [no_name, negative, fixed_without_amount] {
        let result = uc.execute(&admin("county"), input).await;
        assert!(
            matches!(result, Err(ApiError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }

    let mut variable = form1_input();
    variable.allocation_type = AllocationType::Variable;
    variable.amount_per_student = None;
    assert!(uc.execute(&admin("county"), variable).await.is_ok());
}

#[tokio::test]
async fn should_update_existing_bursary_and_keep_created_at() {
    let existing = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let repo = MockBursaryRepo::new(vec![existing.clone()]);
    let handle = repo.bursaries_handle();
    let uc = UpdateBursaryUseCase {
        bursaries: repo,
        gate: AuthorizationGate {
            roles: MockRoleRepo::seeded(),
        },
    };

    let mut input = form1_input();
    input.amount_per_student = Some(7500.0);
    let updated = uc
        .execute(&admin("finance"), existing.id, input)
        .await
        .unwrap();

    assert_eq!(updated.created_at, existing.created_at);
    let stored = handle.lock().unwrap();
    assert_eq!(stored[0].amount_per_student, Some(7500.0));

    drop(stored);
    let missing = uc
        .execute(&admin("county"), Uuid::now_v7(), form1_input())
        .await;
    assert!(
        matches!(missing, Err(ApiError::BursaryNotFound)),
        "expected BursaryNotFound, got {missing:?}"
    );
}

#[tokio::test]
async fn should_page_and_search_bursaries() {
    let mut all = Vec::new();
    for i in 0..30 {
        let mut b = bursary(&format!("Aid {i:02}"), AllocationType::Variable, None);
        b.created_at += chrono::Duration::seconds(i);
        all.push(b);
    }
    all.push(bursary("Tertiary Support", AllocationType::Variable, None));
    let uc = ListBursariesUseCase {
        bursaries: MockBursaryRepo::new(all),
    };

    let first = uc
        .execute(
            PageRequest {
                per_page: 10,
                page: 1,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(first.total_items, 31);
    assert_eq!(first.bursaries.len(), 10);

    let searched = uc
        .execute(PageRequest::default(), Some("  tertiary "))
        .await
        .unwrap();
    assert_eq!(searched.total_items, 1);
    assert_eq!(searched.bursaries[0].name, "Tertiary Support");
}

#[tokio::test]
async fn should_attach_students_active_application_to_bursary() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let applicant = student();
    let app = application(applicant.id(), form1.id, Stage::County);
    let uc = GetBursaryForStudentUseCase {
        bursaries: MockBursaryRepo::new(vec![form1.clone()]),
        applications: MockApplicationRepo::new(vec![app.clone()]),
    };

    let view = uc.execute(&applicant, form1.id).await.unwrap();
    assert_eq!(view.bursary.id, form1.id);
    assert_eq!(view.application.map(|a| a.id), Some(app.id));

    let as_admin = uc.execute(&admin("ward"), form1.id).await.unwrap();
    assert!(as_admin.application.is_none());

    let missing = uc.execute(&applicant, Uuid::now_v7()).await;
    assert!(
        matches!(missing, Err(ApiError::BursaryNotFound)),
        "expected BursaryNotFound, got {:?}",
        missing.map(|v| v.bursary.id)
    );
}

use std::sync::Arc;

use bursary_api::domain::types::Caller;
use bursary_api::error::ApiError;
use bursary_api::usecase::approval::{
    ApproveApplicationUseCase, MAX_BULK_APPROVALS, RejectApplicationUseCase,
};
use bursary_domain::bursary::AllocationType;
use bursary_domain::stage::Stage;
use bursary_domain::workflow::{ApprovalTable, StagePolicy};
use uuid::Uuid;

use crate::helpers::{MockApplicationRepo, admin, application, bursary, student};

fn approve(
    repo: MockApplicationRepo,
    policy: StagePolicy,
) -> ApproveApplicationUseCase<MockApplicationRepo> {
    ApproveApplicationUseCase {
        applications: repo,
        table: Arc::new(ApprovalTable::standard()),
        policy,
    }
}

fn stored_stage(repo: &MockApplicationRepo, id: Uuid) -> Stage {
    repo.applications_handle()
        .lock()
        .unwrap()
        .iter()
        .find(|a| a.id == id)
        .unwrap()
        .stage
}

#[tokio::test]
async fn should_walk_form1_aid_through_full_pipeline() {
    let form1 = bursary("Form1 Aid", AllocationType::Fixed, Some(5000.0));
    let applicant = student();
    let app = application(applicant.id(), form1.id, Stage::Submitted);
    let repo = MockApplicationRepo::new(vec![app.clone()]);
    let handle = repo.applications_handle();
    let uc = approve(repo, StagePolicy::Sequential);

    let steps = [
        ("ward", Stage::Submitted, Stage::County),
        ("county", Stage::County, Stage::Ministry),
        ("finance-assistant", Stage::Ministry, Stage::Finance),
        ("finance", Stage::Finance, Stage::Disbursed),
    ];
    for (role, from, to) in steps {
        let outcome = uc.execute(&admin(role), app.id).await.unwrap();
        assert_eq!(outcome.from, from, "{role} should approve from {from}");
        assert_eq!(outcome.to, to, "{role} should move to {to}");
        let stage = handle
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == app.id)
            .unwrap()
            .stage;
        assert_eq!(stage, to);
    }
}

#[tokio::test]
async fn should_forbid_unmapped_roles_without_touching_stage() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::County);
    let repo = MockApplicationRepo::new(vec![app.clone()]);
    let id = app.id;

    let uc = approve(repo, StagePolicy::Lenient);
    let callers: Vec<Caller> = vec![admin("super-admin"), student()];
    for caller in &callers {
        let result = uc.execute(caller, id).await;
        assert!(
            matches!(result, Err(ApiError::Forbidden)),
            "expected Forbidden for {}, got {result:?}",
            caller.role_name()
        );
    }
    assert_eq!(stored_stage(&uc.applications, id), Stage::County);
}

#[tokio::test]
async fn should_overwrite_stage_under_lenient_policy() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    let uc = approve(MockApplicationRepo::new(vec![app.clone()]), StagePolicy::Lenient);

    let outcome = uc.execute(&admin("finance"), app.id).await.unwrap();

    assert_eq!(outcome.from, Stage::Submitted);
    assert_eq!(outcome.to, Stage::Disbursed);
    assert_eq!(stored_stage(&uc.applications, app.id), Stage::Disbursed);
}

#[tokio::test]
async fn should_reject_skipped_stage_under_sequential_policy() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    let uc = approve(
        MockApplicationRepo::new(vec![app.clone()]),
        StagePolicy::Sequential,
    );

    let result = uc.execute(&admin("county"), app.id).await;

    assert!(
        matches!(
            result,
            Err(ApiError::StageMismatch {
                current: Stage::Submitted,
                target: Stage::Ministry
            })
        ),
        "expected StageMismatch, got {result:?}"
    );
    assert_eq!(stored_stage(&uc.applications, app.id), Stage::Submitted);
}

#[tokio::test]
async fn should_report_conflict_when_stage_changed_concurrently() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    let mut repo = MockApplicationRepo::new(vec![app.clone()]);
    repo.concurrent_stage = Some(Stage::County);
    let uc = approve(repo, StagePolicy::Lenient);

    let result = uc.execute(&admin("ward"), app.id).await;

    assert!(
        matches!(result, Err(ApiError::StageConflict)),
        "expected StageConflict, got {result:?}"
    );
    assert_eq!(stored_stage(&uc.applications, app.id), Stage::County);
}

#[tokio::test]
async fn should_return_not_found_for_withdrawn_application() {
    let mut app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    app.soft_delete = true;
    let uc = approve(MockApplicationRepo::new(vec![app.clone()]), StagePolicy::Lenient);

    let result = uc.execute(&admin("ward"), app.id).await;
    assert!(
        matches!(result, Err(ApiError::ApplicationNotFound)),
        "expected ApplicationNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_record_remarks_on_reject_without_moving_stage() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::County);
    let repo = MockApplicationRepo::new(vec![app.clone()]);
    let handle = repo.applications_handle();
    let uc = RejectApplicationUseCase {
        applications: repo,
        table: Arc::new(ApprovalTable::standard()),
    };

    uc.execute(
        &admin("county"),
        app.id,
        Some("  missing fee structure ".to_owned()),
    )
    .await
    .unwrap();

    let apps = handle.lock().unwrap();
    assert_eq!(apps[0].stage, Stage::County);
    assert_eq!(apps[0].remarks.as_deref(), Some("missing fee structure"));
}

#[tokio::test]
async fn should_forbid_reject_by_unmapped_role() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::County);
    let uc = RejectApplicationUseCase {
        applications: MockApplicationRepo::new(vec![app.clone()]),
        table: Arc::new(ApprovalTable::standard()),
    };

    let result = uc.execute(&admin("super-admin"), app.id, None).await;
    assert!(
        matches!(result, Err(ApiError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_when_rejecting_unknown_application() {
    let uc = RejectApplicationUseCase {
        applications: MockApplicationRepo::new(vec![]),
        table: Arc::new(ApprovalTable::standard()),
    };

    let result = uc.execute(&admin("ward"), Uuid::now_v7(), None).await;
    assert!(
        matches!(result, Err(ApiError::ApplicationNotFound)),
        "expected ApplicationNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_each_id_of_a_bulk_approval() {
    let ready = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    let also_ready = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    let further_along = application(Uuid::now_v7(), Uuid::now_v7(), Stage::County);
    let missing = Uuid::now_v7();
    let repo = MockApplicationRepo::new(vec![
        ready.clone(),
        also_ready.clone(),
        further_along.clone(),
    ]);
    let uc = approve(repo, StagePolicy::Sequential);

    let results = uc
        .execute_many(
            &admin("ward"),
            &[ready.id, missing, further_along.id, also_ready.id, ready.id],
        )
        .await
        .unwrap();

    let ids: Vec<_> = results.iter().map(|r| r.application_id).collect();
    assert_eq!(ids, [ready.id, missing, further_along.id, also_ready.id]);
    assert!(matches!(
        results[0].outcome,
        Ok(o) if o.from == Stage::Submitted && o.to == Stage::County
    ));
    assert!(matches!(results[1].outcome, Err(ApiError::ApplicationNotFound)));
    assert!(matches!(
        results[2].outcome,
        Err(ApiError::StageMismatch { current: Stage::County, target: Stage::County })
    ));
    assert!(results[3].outcome.is_ok());

    assert_eq!(stored_stage(&uc.applications, ready.id), Stage::County);
    assert_eq!(stored_stage(&uc.applications, also_ready.id), Stage::County);
    assert_eq!(stored_stage(&uc.applications, further_along.id), Stage::County);
}

#[tokio::test]
async fn should_reject_bulk_approval_from_unmapped_role_or_bad_batch() {
    let app = application(Uuid::now_v7(), Uuid::now_v7(), Stage::Submitted);
    let repo = MockApplicationRepo::new(vec![app.clone()]);
    let uc = approve(repo, StagePolicy::Lenient);

    let result = uc.execute_many(&admin("super-admin"), &[app.id]).await;
    assert!(matches!(result, Err(ApiError::Forbidden)), "got {result:?}");

    let result = uc.execute_many(&admin("ward"), &[]).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))), "got {result:?}");

    let too_many: Vec<Uuid> = (0..=MAX_BULK_APPROVALS).map(|_| Uuid::now_v7()).collect();
    let result = uc.execute_many(&admin("ward"), &too_many).await;
    assert!(matches!(result, Err(ApiError::InvalidInput(_))), "got {result:?}");

    assert_eq!(stored_stage(&uc.applications, app.id), Stage::Submitted);
}

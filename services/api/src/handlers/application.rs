use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bursary_auth_types::identity::Identity;
use bursary_domain::stage::Stage;

use crate::domain::types::{Application, ApplicationDetails, StudentSummary};
use crate::error::ApiError;
use crate::handlers::bursary::BursaryResponse;
use crate::handlers::profile::{InstitutionBody, PersonalBody};
use crate::handlers::resolve_caller;
use crate::state::AppState;
use crate::usecase::application::{
    CreateApplicationUseCase, GetApplicationDetailsUseCase, ListReviewQueueUseCase,
    ListStudentApplicationsUseCase, WithdrawApplicationUseCase,
};
use crate::usecase::approval::{
    ApproveApplicationUseCase, BulkApprovalResult, RejectApplicationUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub bursary_id: Uuid,
    pub student_id: Uuid,
    pub stage: Stage,
    pub remarks: Option<String>,
    #[serde(serialize_with = "bursary_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "bursary_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Application> for ApplicationResponse {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            bursary_id: a.bursary_id,
            student_id: a.student_id,
            stage: a.stage,
            remarks: a.remarks,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct StudentSummaryResponse {
    pub id: Uuid,
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
}

impl From<StudentSummary> for StudentSummaryResponse {
    fn from(s: StudentSummary) -> Self {
        Self {
            id: s.id,
            firstname: s.firstname,
            middlename: s.middlename,
            lastname: s.lastname,
            email: s.email,
        }
    }
}

#[derive(Serialize)]
pub struct ApplicationDetailsResponse {
    pub application: ApplicationResponse,
    pub bursary: BursaryResponse,
    pub student: StudentSummaryResponse,
    pub personal: Option<PersonalBody>,
    pub institution: Option<InstitutionBody>,
}

impl From<ApplicationDetails> for ApplicationDetailsResponse {
    fn from(d: ApplicationDetails) -> Self {
        Self {
            application: d.application.into(),
            bursary: d.bursary.into(),
            student: d.student.into(),
            personal: d.personal.map(Into::into),
            institution: d.institution.map(Into::into),
        }
    }
}

#[derive(Deserialize)]
pub struct BursaryRef {
    pub bursary_id: Uuid,
}

// ── POST /applications ───────────────────────────────────────────────────────

pub async fn create_application(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<BursaryRef>,
) -> Result<(StatusCode, Json<ApplicationResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = CreateApplicationUseCase {
        applications: state.application_repo(),
        bursaries: state.bursary_repo(),
    };
    let application = usecase.execute(&caller, body.bursary_id).await?;
    Ok((StatusCode::CREATED, Json(application.into())))
}

// ── PUT /applications ────────────────────────────────────────────────────────

pub async fn withdraw_application(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<BursaryRef>,
) -> Result<StatusCode, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = WithdrawApplicationUseCase {
        applications: state.application_repo(),
    };
    usecase.execute(&caller, body.bursary_id).await?;
    Ok(StatusCode::ACCEPTED)
}

// ── GET /students/me/applications ────────────────────────────────────────────

#[derive(Serialize)]
pub struct StudentApplicationResponse {
    pub application: ApplicationResponse,
    pub bursary: BursaryResponse,
}

pub async fn list_my_applications(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentApplicationResponse>>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = ListStudentApplicationsUseCase {
        applications: state.application_repo(),
    };
    let items = usecase
        .execute(&caller)
        .await?
        .into_iter()
        .map(|item| StudentApplicationResponse {
            application: item.application.into(),
            bursary: item.bursary.into(),
        })
        .collect();
    Ok(Json(items))
}

// ── GET /applications ────────────────────────────────────────────────────────

pub async fn list_review_queue(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ApplicationDetailsResponse>>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = ListReviewQueueUseCase {
        applications: state.application_repo(),
        table: state.approval_table.clone(),
    };
    let queue = usecase.execute(&caller).await?;
    Ok(Json(queue.into_iter().map(Into::into).collect()))
}

// ── GET /applications/{id} ───────────────────────────────────────────────────

pub async fn get_application(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetailsResponse>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = GetApplicationDetailsUseCase {
        applications: state.application_repo(),
        gate: state.authorization_gate(),
    };
    Ok(Json(usecase.execute(&caller, id).await?.into()))
}

// ── POST /approve ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ApproveRequest {
    pub id: Uuid,
}

#[derive(Serialize)]
pub struct ApproveResponse {
    pub id: Uuid,
    pub from: Stage,
    pub to: Stage,
}

pub async fn approve_application(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ApproveRequest>,
) -> Result<(StatusCode, Json<ApproveResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = ApproveApplicationUseCase {
        applications: state.application_repo(),
        table: state.approval_table.clone(),
        policy: state.stage_policy,
    };
    let outcome = usecase.execute(&caller, body.id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ApproveResponse {
            id: outcome.application_id,
            from: outcome.from,
            to: outcome.to,
        }),
    ))
}

// ── POST /approve/bulk ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BulkApproveRequest {
    pub ids: Vec<Uuid>,
}

/// One entry per distinct id. `error` carries the error kind when that id was not
/// approved.
#[derive(Serialize)]
pub struct BulkApproveItem {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl From<BulkApprovalResult> for BulkApproveItem {
    fn from(r: BulkApprovalResult) -> Self {
        match r.outcome {
            Ok(outcome) => Self {
                id: r.application_id,
                from: Some(outcome.from),
                to: Some(outcome.to),
                error: None,
            },
            Err(e) => Self {
                id: r.application_id,
                from: None,
                to: None,
                error: Some(e.kind()),
            },
        }
    }
}

pub async fn approve_applications_bulk(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<BulkApproveRequest>,
) -> Result<(StatusCode, Json<Vec<BulkApproveItem>>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = ApproveApplicationUseCase {
        applications: state.application_repo(),
        table: state.approval_table.clone(),
        policy: state.stage_policy,
    };
    let results = usecase.execute_many(&caller, &body.ids).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(results.into_iter().map(Into::into).collect()),
    ))
}

// ── POST /reject ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RejectRequest {
    pub id: Uuid,
    pub remarks: Option<String>,
}

pub async fn reject_application(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<RejectRequest>,
) -> Result<StatusCode, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = RejectApplicationUseCase {
        applications: state.application_repo(),
        table: state.approval_table.clone(),
    };
    usecase.execute(&caller, body.id, body.remarks).await?;
    Ok(StatusCode::ACCEPTED)
}

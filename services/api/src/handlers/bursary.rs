use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bursary_auth_types::identity::Identity;
use bursary_domain::bursary::AllocationType;
use bursary_domain::pagination::PageRequest;

use crate::domain::types::Bursary;
use crate::error::ApiError;
use crate::handlers::application::ApplicationResponse;
use crate::handlers::resolve_caller;
use crate::state::AppState;
use crate::usecase::bursary::{
    BursaryInput, CreateBursaryUseCase, GetBursaryForStudentUseCase, ListBursariesUseCase,
    UpdateBursaryUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BursaryResponse {
    pub id: Uuid,
    pub bursary_name: String,
    pub description: Option<String>,
    pub end_date: NaiveDate,
    pub amount_allocated: Option<f64>,
    pub amount_per_student: Option<f64>,
    pub allocation_type: AllocationType,
    #[serde(serialize_with = "bursary_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Bursary> for BursaryResponse {
    fn from(b: Bursary) -> Self {
        Self {
            id: b.id,
            bursary_name: b.name,
            description: b.description,
            end_date: b.end_date,
            amount_allocated: b.amount_allocated,
            amount_per_student: b.amount_per_student,
            allocation_type: b.allocation_type,
            created_at: b.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct BursaryRequest {
    pub bursary_name: String,
    pub description: Option<String>,
    pub end_date: NaiveDate,
    pub amount_allocated: Option<f64>,
    pub amount_per_student: Option<f64>,
    pub allocation_type: AllocationType,
}

impl From<BursaryRequest> for BursaryInput {
    fn from(body: BursaryRequest) -> Self {
        Self {
            name: body.bursary_name,
            description: body.description,
            end_date: body.end_date,
            amount_allocated: body.amount_allocated,
            amount_per_student: body.amount_per_student,
            allocation_type: body.allocation_type,
        }
    }
}

// ── GET /bursaries ───────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BursaryListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct BursaryListResponse {
    pub bursaries: Vec<BursaryResponse>,
    pub total_items: u64,
}

pub async fn list_bursaries(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<BursaryListQuery>,
) -> Result<Json<BursaryListResponse>, ApiError> {
    resolve_caller(&state, identity).await?;
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let usecase = ListBursariesUseCase {
        bursaries: state.bursary_repo(),
    };
    let result = usecase.execute(page, query.search.as_deref()).await?;
    Ok(Json(BursaryListResponse {
        bursaries: result.bursaries.into_iter().map(Into::into).collect(),
        total_items: result.total_items,
    }))
}

// ── POST /bursaries ──────────────────────────────────────────────────────────

pub async fn create_bursary(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<BursaryRequest>,
) -> Result<(StatusCode, Json<BursaryResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = CreateBursaryUseCase {
        bursaries: state.bursary_repo(),
        gate: state.authorization_gate(),
    };
    let bursary = usecase.execute(&caller, body.into()).await?;
    Ok((StatusCode::CREATED, Json(bursary.into())))
}

// ── PUT /bursaries/{id} ──────────────────────────────────────────────────────

pub async fn update_bursary(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<BursaryRequest>,
) -> Result<(StatusCode, Json<BursaryResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = UpdateBursaryUseCase {
        bursaries: state.bursary_repo(),
        gate: state.authorization_gate(),
    };
    let bursary = usecase.execute(&caller, id, body.into()).await?;
    Ok((StatusCode::ACCEPTED, Json(bursary.into())))
}

// ── GET /bursaries/{id} ──────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BursaryDetailResponse {
    pub bursary: BursaryResponse,
    /// The calling student's active application to this bursary.
    pub application: Option<ApplicationResponse>,
}

pub async fn get_bursary(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BursaryDetailResponse>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = GetBursaryForStudentUseCase {
        bursaries: state.bursary_repo(),
        applications: state.application_repo(),
    };
    let result = usecase.execute(&caller, id).await?;
    Ok(Json(BursaryDetailResponse {
        bursary: result.bursary.into(),
        application: result.application.map(Into::into),
    }))
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::domain::repository::PrincipalRepository;
use crate::error::ApiError;
use crate::handlers::PrincipalResponse;
use crate::state::AppState;
use crate::usecase::activation::ActivatePrincipalUseCase;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::registration::{RegisterStudentInput, RegisterStudentUseCase};

// ── POST /auth/students/register ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterStudentRequest {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub password: String,
}

pub async fn register_student(
    State(state): State<AppState>,
    Json(body): Json<RegisterStudentRequest>,
) -> Result<(StatusCode, Json<PrincipalResponse>), ApiError> {
    let usecase = RegisterStudentUseCase {
        roles: state.role_repo(),
        register: state.register_principal(state.student_repo()),
    };
    let student = usecase
        .execute(RegisterStudentInput {
            firstname: body.firstname,
            middlename: body.middlename,
            lastname: body.lastname,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(student.into())))
}

// ── POST /auth/{students,admins}/login ───────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Unix seconds.
    pub expires_at: u64,
    pub principal: PrincipalResponse,
}

async fn login<P: PrincipalRepository>(
    state: &AppState,
    principals: P,
    body: LoginRequest,
) -> Result<Json<LoginResponse>, ApiError> {
    let usecase = LoginUseCase {
        principals,
        token_keys: state.token_keys.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(Json(LoginResponse {
        token: output.token,
        expires_at: output.expires_at,
        principal: output.principal.into(),
    }))
}

pub async fn login_student(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(&state, state.student_repo(), body).await
}

pub async fn login_admin(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    login(&state, state.admin_repo(), body).await
}

// ── GET /{students,admins}/activate/{token} ─────────────────────────────────

pub async fn activate_student(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    let usecase = ActivatePrincipalUseCase {
        principals: state.student_repo(),
    };
    usecase.execute(&token).await?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn activate_admin(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<StatusCode, ApiError> {
    let usecase = ActivatePrincipalUseCase {
        principals: state.admin_repo(),
    };
    usecase.execute(&token).await?;
    Ok(StatusCode::ACCEPTED)
}

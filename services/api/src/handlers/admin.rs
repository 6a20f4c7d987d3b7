use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use bursary_auth_types::identity::Identity;
use bursary_domain::access::RoleLevel;

use crate::error::ApiError;
use crate::handlers::{PrincipalResponse, resolve_caller};
use crate::state::AppState;
use crate::usecase::admin::{ListAdminsUseCase, ListRolesUseCase};
use crate::usecase::registration::{RegisterAdminInput, RegisterAdminUseCase};

// ── POST /admins ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterAdminRequest {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub role_id: i32,
    pub role_code: Option<String>,
}

pub async fn register_admin(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<RegisterAdminRequest>,
) -> Result<(StatusCode, Json<PrincipalResponse>), ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = RegisterAdminUseCase {
        roles: state.role_repo(),
        register: state.register_principal(state.admin_repo()),
    };
    let admin = usecase
        .execute(
            &caller,
            RegisterAdminInput {
                firstname: body.firstname,
                middlename: body.middlename,
                lastname: body.lastname,
                email: body.email,
                password: body.password,
                role_id: body.role_id,
                role_code: body.role_code,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(admin.into())))
}

// ── GET /admins ──────────────────────────────────────────────────────────────

pub async fn list_admins(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<PrincipalResponse>>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = ListAdminsUseCase {
        admins: state.admin_repo(),
    };
    let admins = usecase.execute(&caller).await?;
    Ok(Json(admins.into_iter().map(Into::into).collect()))
}

// ── GET /roles ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RoleResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub level: RoleLevel,
}

pub async fn list_roles(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<RoleResponse>>, ApiError> {
    let caller = resolve_caller(&state, identity).await?;
    let usecase = ListRolesUseCase {
        roles: state.role_repo(),
    };
    let roles = usecase
        .execute(&caller)
        .await?
        .into_iter()
        .map(|r| RoleResponse {
            id: r.id,
            name: r.name,
            description: r.description,
            level: r.level,
        })
        .collect();
    Ok(Json(roles))
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bursary_core::db::DeadlineExceeded;
use bursary_domain::stage::Stage;
use bursary_domain::workflow::TransitionError;

/// API service error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("account blocked")]
    AccountBlocked,
    #[error("account not activated")]
    AccountNotActivated,
    #[error("application not found")]
    ApplicationNotFound,
    #[error("bursary not found")]
    BursaryNotFound,
    #[error("role not found")]
    RoleNotFound,
    #[error("profile not found")]
    ProfileNotFound,
    #[error("email already exists")]
    EmailAlreadyExists,
    #[error("application already exists")]
    ApplicationAlreadyExists,
    #[error("application was modified concurrently")]
    StageConflict,
    #[error("application is at stage {current}, cannot move to {target}")]
    StageMismatch { current: Stage, target: Stage },
    #[error("failed to deliver notification")]
    NotificationFailed(#[source] anyhow::Error),
    #[error("request timed out")]
    Timeout,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::AccountBlocked => "ACCOUNT_BLOCKED",
            Self::AccountNotActivated => "ACCOUNT_NOT_ACTIVATED",
            Self::ApplicationNotFound => "APPLICATION_NOT_FOUND",
            Self::BursaryNotFound => "BURSARY_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::ApplicationAlreadyExists => "APPLICATION_ALREADY_EXISTS",
            Self::StageConflict => "STAGE_CONFLICT",
            Self::StageMismatch { .. } => "STAGE_MISMATCH",
            Self::NotificationFailed(_) => "NOTIFICATION_FAILED",
            Self::Timeout => "TIMEOUT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidToken | Self::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden | Self::AccountBlocked | Self::AccountNotActivated => {
                StatusCode::FORBIDDEN
            }
            Self::ApplicationNotFound
            | Self::BursaryNotFound
            | Self::RoleNotFound
            | Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::EmailAlreadyExists
            | Self::ApplicationAlreadyExists
            | Self::StageConflict
            | Self::StageMismatch { .. } => StatusCode::CONFLICT,
            Self::NotificationFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<TransitionError> for ApiError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::Forbidden { .. } => Self::Forbidden,
            TransitionError::StageMismatch { current, target } => {
                Self::StageMismatch { current, target }
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid"),
                })
            })
            .collect();
        messages.sort();
        Self::InvalidInput(messages.join("; "))
    }
}

impl From<DeadlineExceeded> for ApiError {
    fn from(_: DeadlineExceeded) -> Self {
        Self::Timeout
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and TraceLayer already records them.
        // 5xx need the anyhow chain so the root cause is traceable.
        match &self {
            Self::Internal(e) | Self::NotificationFailed(e) => {
                tracing::error!(error = ?e, kind = self.kind(), "request failed");
            }
            Self::Timeout => tracing::error!(kind = "TIMEOUT", "request failed"),
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

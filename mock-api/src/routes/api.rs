//! Resource endpoints backed by the mock service.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use session::net::api::{ResourceService, token_from_header};
use session::net::types::LoginRequest;
use session::{LoginResponse, ServiceError, SlowData, UserRecord};
use tracing::warn;

use crate::state::AppState;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Service failure rendered as `{"error": message}` with the matching status.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

pub(crate) fn status_for(err: &ServiceError) -> StatusCode {
    match err {
        ServiceError::Transport(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        other => other
            .status()
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub(crate) fn message_for(err: &ServiceError) -> String {
    match err {
        ServiceError::Unauthorized(message) | ServiceError::Status { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(serde_json::json!({ "error": message_for(&self.0) }))).into_response()
    }
}

fn bearer_token(headers: &HeaderMap) -> &str {
    token_from_header(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/login` — exchange credentials for a token and profile.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    match state.api.authenticate(&body.username, &body.password).await {
        Ok(response) => {
            tracing::info!(username = %body.username, role = %response.user.role, "login accepted");
            Ok(Json(response))
        }
        Err(err) => {
            warn!(username = %body.username, error = %err, "login rejected");
            Err(err.into())
        }
    }
}

/// `GET /api/users` — user directory.
pub async fn users(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Vec<UserRecord>>, ApiError> {
    Ok(Json(state.api.list_users(bearer_token(&headers)).await?))
}

/// `GET /api/slow-data` — dashboard metrics after a long delay.
pub async fn slow_data(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<SlowData>, ApiError> {
    Ok(Json(state.api.slow_data(bearer_token(&headers)).await?))
}

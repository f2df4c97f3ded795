//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves the three resource endpoints the session client talks to, at the
//! paths declared in `session::net::api`, plus a health probe. Every request
//! is answered by the shared in-process `MockApi`.

pub mod api;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use session::net::api::{LOGIN_ENDPOINT, SLOW_DATA_ENDPOINT, USERS_ENDPOINT};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(LOGIN_ENDPOINT, post(api::login))
        .route(USERS_ENDPOINT, get(api::users))
        .route(SLOW_DATA_ENDPOINT, get(api::slow_data))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

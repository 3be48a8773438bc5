//! HTTP Surface
//!
//! This module organizes the route handlers into logical submodules.
//! Each submodule handles a specific slice of the API.
//!
//! ## Module Organization
//! - `state` - Application state shared by all handlers
//! - `progress` - Progress listing and solve recording
//! - `submit` - Answer validation against the bundled catalog
//! - `admin` - Token-gated clear (preview + destructive) and diagnostics
//! - `status` - Unlock projection and countdown, with `?now=` override

mod state;

pub mod admin;
pub mod progress;
pub mod status;
pub mod submit;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

pub use state::AppState;

use crate::db;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/progress", get(progress::list).post(progress::record))
        .route("/submit", post(submit::submit))
        .route("/admin/clear", get(admin::preview).post(admin::clear))
        .route("/admin/ping", get(admin::ping))
        .route("/ping", get(store_ping))
        .route("/status", get(status::status))
        .with_state(state)
}

/// Standard failure body: `{ok: false, error}`.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

pub(crate) fn error_response(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            ok: false,
            error: error.into(),
        }),
    )
        .into_response()
}

pub(crate) fn store_unavailable() -> axum::response::Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store not initialized")
}

#[derive(Serialize)]
struct PingResponse {
    ok: bool,
    pong: String,
}

/// Store liveness: `GET /ping`.
async fn store_ping(State(state): State<AppState>) -> impl IntoResponse {
    let Some(pool) = state.pool().await else {
        return store_unavailable();
    };
    match db::ping(&pool).await {
        Ok(()) => Json(PingResponse {
            ok: true,
            pong: "PONG".to_string(),
        })
        .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    }
}

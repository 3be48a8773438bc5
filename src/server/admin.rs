//! Admin surface
//!
//! This module handles:
//! - `GET  /admin/clear` - preview what a clear would delete
//! - `POST /admin/clear` - delete a player's namespace (two-phase, with
//!   per-phase counters so index drift is visible)
//! - `GET  /admin/ping` - token diagnostics
//!
//! Every route except the diagnostics requires the shared admin secret,
//! passed via the `x-admin-token` header or the `token` query param.
//! A missing server-side secret is a 500 (misconfiguration), a mismatch
//! is a 401; neither touches the store.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{store_unavailable, AppState};
use crate::db::progress::{self, ClearReport};

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AdminParams {
    pub player: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthFailure {
    ok: bool,
    status: u16,
    error: String,
}

fn provided_token<'a>(headers: &'a HeaderMap, params: &'a AdminParams) -> &'a str {
    headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .or(params.token.as_deref())
        .unwrap_or("")
}

fn check_auth(state: &AppState, headers: &HeaderMap, params: &AdminParams) -> Result<(), Response> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        let failure = AuthFailure {
            ok: false,
            status: 500,
            error: "ADMIN_TOKEN not set on server".to_string(),
        };
        return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response());
    };
    if provided_token(headers, params) != expected {
        let failure = AuthFailure {
            ok: false,
            status: 401,
            error: "Unauthorized".to_string(),
        };
        return Err((StatusCode::UNAUTHORIZED, Json(failure)).into_response());
    }
    Ok(())
}

fn player_of(state: &AppState, params: &AdminParams) -> String {
    params
        .player
        .clone()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| state.config.default_player.clone())
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewResponse {
    ok: bool,
    player: String,
    set_key: String,
    members_count: usize,
    members: Vec<String>,
    extras_count: usize,
    extras: Vec<String>,
}

/// GET = preview what will be deleted
pub async fn preview(
    State(state): State<AppState>,
    Query(params): Query<AdminParams>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&state, &headers, &params) {
        return resp;
    }
    let player = player_of(&state, &params);

    let Some(pool) = state.pool().await else {
        return store_unavailable();
    };

    let members = match progress::index_members(&pool, &player).await {
        Ok(members) => members,
        Err(e) => return super::error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    };
    let extras = match progress::scan_keys(&pool, &progress::player_prefix(&player)).await {
        Ok(extras) => extras,
        Err(e) => return super::error_response(StatusCode::INTERNAL_SERVER_ERROR, e),
    };

    Json(PreviewResponse {
        ok: true,
        set_key: progress::set_key(&player),
        members_count: members.len(),
        members,
        extras_count: extras.len(),
        extras,
        player,
    })
    .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearResponse {
    ok: bool,
    player: String,
    #[serde(flatten)]
    report: ClearReport,
}

/// POST = delete everything for the player
pub async fn clear(
    State(state): State<AppState>,
    Query(params): Query<AdminParams>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = check_auth(&state, &headers, &params) {
        return resp;
    }
    let player = player_of(&state, &params);

    let Some(pool) = state.pool().await else {
        return store_unavailable();
    };

    match progress::clear_player(&pool, &player).await {
        Ok(report) => {
            log::info!(
                "cleared {player}: {} members, {} set, {} extras",
                report.members_deleted,
                report.set_deleted,
                report.extras_deleted
            );
            Json(ClearResponse {
                ok: true,
                player,
                report,
            })
            .into_response()
        }
        Err(e) => {
            log::error!("clear failed for {player}: {e}");
            super::error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PingResponse {
    ok: bool,
    server_has_token: bool,
    server_token_length: usize,
    header_token_length: usize,
    query_token_length: usize,
    header_matches: bool,
    query_matches: bool,
}

/// Token diagnostics without revealing the secret.
pub async fn ping(
    State(state): State<AppState>,
    Query(params): Query<AdminParams>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let server_token = state.config.admin_token.as_deref().unwrap_or("");
    let header_token = headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let query_token = params.token.as_deref().unwrap_or("");

    Json(PingResponse {
        ok: true,
        server_has_token: !server_token.is_empty(),
        server_token_length: server_token.len(),
        header_token_length: header_token.len(),
        query_token_length: query_token.len(),
        header_matches: !server_token.is_empty() && header_token == server_token,
        query_matches: !server_token.is_empty() && query_token == server_token,
    })
}

//! Progress listing and solve recording
//!
//! This module handles:
//! - `GET /progress?player=` - list a player's solves for hydration and
//!   the admin panel, ordered by ascending solve timestamp
//! - `POST /progress` - upsert a solve record (fire-and-forget from the
//!   player's point of view)

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{error_response, store_unavailable, AppState};
use crate::db::progress::{self, SolveRow};

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub player: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub ok: bool,
    pub player_id: String,
    pub count: usize,
    pub rows: Vec<SolveRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
    pub player_id: Option<String>,
    pub puzzle_id: Option<String>,
    pub answer: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// List progress: `GET /progress?player=keenan`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let player = params
        .player
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| state.config.default_player.clone());

    let Some(pool) = state.pool().await else {
        return store_unavailable();
    };

    match progress::list_solves(&pool, &player).await {
        Ok(rows) => Json(ListResponse {
            ok: true,
            player_id: player,
            count: rows.len(),
            rows,
        })
        .into_response(),
        Err(e) => {
            log::error!("progress list failed for {player}: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// Save a solve: `POST /progress`
pub async fn record(
    State(state): State<AppState>,
    Json(body): Json<RecordBody>,
) -> impl IntoResponse {
    let (Some(player), Some(puzzle), Some(answer)) = (
        body.player_id.filter(|s| !s.is_empty()),
        body.puzzle_id.filter(|s| !s.is_empty()),
        body.answer.filter(|s| !s.is_empty()),
    ) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing fields");
    };

    let Some(pool) = state.pool().await else {
        return store_unavailable();
    };

    if let Err(e) = progress::record_solve(&pool, &player, &puzzle, &answer, body.meta.as_ref()).await
    {
        log::error!("record solve failed for {player}/{puzzle}: {e}");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, e);
    }

    log::info!("recorded solve {puzzle} for {player}");

    if let Some(notifier) = state.notifier.clone() {
        tokio::spawn(async move {
            notifier.notify_solved(&player, &puzzle, &answer).await;
        });
    }

    Json(OkResponse { ok: true }).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::db::init::test_support::memory_pool;

    async fn ready_state() -> AppState {
        let config = AppConfig {
            addr: "127.0.0.1:0".into(),
            db_path: ":memory:".into(),
            admin_token: Some("sekrit".into()),
            launch_local: chrono::NaiveDate::from_ymd_opt(2025, 11, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            unlock_hour: 0,
            default_player: "keenan".into(),
            resend_api_key: None,
            notify_email: None,
        };
        let state = AppState::new(config, crate::puzzles::load_catalog().unwrap());
        state.install_pool(memory_pool().await).await;
        state
    }

    fn record_body(player: Option<&str>, puzzle: Option<&str>, answer: Option<&str>) -> RecordBody {
        RecordBody {
            player_id: player.map(String::from),
            puzzle_id: puzzle.map(String::from),
            answer: answer.map(String::from),
            meta: None,
        }
    }

    #[tokio::test]
    async fn test_record_then_list_round_trip() {
        let state = ready_state().await;

        let resp = record(
            State(state.clone()),
            Json(record_body(Some("keenan"), Some("d1"), Some("Paris"))),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);

        let pool = state.pool().await.unwrap();
        let rows = progress::list_solves(&pool, "keenan").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].answer, "Paris");
        assert!(rows[0].correct);
    }

    #[tokio::test]
    async fn test_record_missing_fields_is_400() {
        let state = ready_state().await;

        for body in [
            record_body(None, Some("d1"), Some("x")),
            record_body(Some("keenan"), None, Some("x")),
            record_body(Some("keenan"), Some("d1"), None),
            record_body(Some(""), Some("d1"), Some("x")),
        ] {
            let resp = record(State(state.clone()), Json(body)).await.into_response();
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        }

        let pool = state.pool().await.unwrap();
        assert!(progress::list_solves(&pool, "keenan").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_defaults_player() {
        let state = ready_state().await;
        let resp = list(State(state), Query(ListParams { player: None }))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_store_not_ready_is_500() {
        let config = AppConfig {
            addr: "127.0.0.1:0".into(),
            db_path: ":memory:".into(),
            admin_token: None,
            launch_local: chrono::NaiveDate::from_ymd_opt(2025, 11, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            unlock_hour: 0,
            default_player: "keenan".into(),
            resend_api_key: None,
            notify_email: None,
        };
        let state = AppState::new(config, Vec::new());

        let resp = list(State(state), Query(ListParams { player: None }))
            .await
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

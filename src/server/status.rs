//! Unlock status projection
//!
//! `GET /status` reports which days are open and the next-unlock
//! countdown. A `?now=` override (epoch ms or a date/datetime string)
//! is accepted for QA and flows through the Clock abstraction; the
//! stored progress timestamps are never affected by it.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::clock::{parse_now_override, Clock};
use crate::schedule::{countdown, CountdownParts};

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub now: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub ok: bool,
    pub total_days: usize,
    pub unlocked_count: usize,
    /// -1 before the first unlock, else the current day's index.
    pub current_index: i64,
    pub next_unlock_at: Option<String>,
    pub countdown: CountdownParts,
    pub now: String,
}

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub async fn status(
    State(state): State<AppState>,
    Query(params): Query<StatusParams>,
) -> impl IntoResponse {
    let clock = params
        .now
        .as_deref()
        .and_then(parse_now_override)
        .map(Clock::anchored)
        .unwrap_or_else(Clock::system);

    let now = clock.now_local();
    let schedule = state.config.schedule(state.puzzles.len());
    let unlock = schedule.unlock_status(now);
    let parts = countdown(schedule.next_unlock_target(now), now);

    Json(StatusResponse {
        ok: true,
        total_days: schedule.total_days,
        unlocked_count: unlock.unlocked_count,
        current_index: unlock.current_index.map(|i| i as i64).unwrap_or(-1),
        next_unlock_at: unlock.next_unlock.map(|t| t.format(WIRE_FORMAT).to_string()),
        countdown: parts,
        now: now.format(WIRE_FORMAT).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::http::StatusCode;

    fn state() -> AppState {
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
        AppState::new(config, crate::puzzles::load_catalog().unwrap())
    }

    #[tokio::test]
    async fn test_status_with_override() {
        let resp = status(
            State(state()),
            Query(StatusParams {
                now: Some("2025-11-03T00:00:01".to_string()),
            }),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_status_ignores_bad_override() {
        let resp = status(
            State(state()),
            Query(StatusParams {
                now: Some("not-a-time".to_string()),
            }),
        )
        .await
        .into_response();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

//! Answer validation
//!
//! `POST /submit` checks a submitted answer against the bundled catalog
//! and returns the verdict plus the reveal text on success. This is the
//! remote half of the filmstrip's local-first answer check; it never
//! touches the store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::answer;
use crate::puzzles;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub puzzle_id: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub correct: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_text: Option<String>,
}

impl SubmitResponse {
    fn incorrect() -> Self {
        Self {
            correct: false,
            reveal_text: None,
        }
    }
}

pub async fn submit(
    State(state): State<AppState>,
    Json(body): Json<SubmitBody>,
) -> impl IntoResponse {
    let Some(puzzle_id) = body.puzzle_id.filter(|s| !s.is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(SubmitResponse::incorrect())).into_response();
    };

    let Some(puzzle) = puzzles::find(&state.puzzles, &puzzle_id) else {
        return (StatusCode::NOT_FOUND, Json(SubmitResponse::incorrect())).into_response();
    };

    let submitted = body.answer.unwrap_or_default();
    let correct = answer::matches(&submitted, puzzle.answers());

    Json(SubmitResponse {
        correct,
        reveal_text: correct.then(|| {
            puzzle
                .reveal_text
                .clone()
                .unwrap_or_else(|| "Correct!".to_string())
        }),
    })
    .into_response()
}

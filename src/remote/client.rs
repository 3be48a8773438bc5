// Progress API Client
// Consumes the HTTP progress surface on behalf of a player session:
// hydration reads, remote answer validation, and fire-and-forget solve
// persistence. Every call is best-effort from the caller's perspective;
// the session logs failures and keeps local state authoritative.

use reqwest::Client;
use serde::Deserialize;

use crate::db::progress::SolveRow;

/// Error types for remote progress operations
#[derive(Debug)]
pub enum RemoteError {
    /// HTTP request failed
    Network(String),
    /// The server answered with a non-success payload or status
    Api(String),
    /// Failed to parse the response body
    Parse(String),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Network(e) => write!(f, "Network error: {e}"),
            RemoteError::Api(e) => write!(f, "Progress API error: {e}"),
            RemoteError::Parse(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Remote verdict on a submitted answer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub correct: bool,
    #[serde(default)]
    pub reveal_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    rows: Option<Vec<SolveRow>>,
}

#[derive(Debug, Deserialize)]
struct OkEnvelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the progress API, bound to one player.
#[derive(Clone)]
pub struct ProgressClient {
    http: Client,
    base_url: String,
    player_id: String,
}

impl ProgressClient {
    /// Create a client for `player_id` against `base_url`
    /// (e.g. `http://127.0.0.1:8787`).
    pub fn new(base_url: impl Into<String>, player_id: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::builder()
                .user_agent("daygate/0.1.0")
                .timeout(std::time::Duration::from_secs(7))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            player_id: player_id.into(),
        }
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// Fetch this player's recorded solves for hydration, ordered by
    /// ascending solve timestamp.
    pub async fn fetch_progress(&self) -> Result<Vec<SolveRow>, RemoteError> {
        let response = self
            .http
            .get(format!("{}/progress", self.base_url))
            .query(&[("player", self.player_id.as_str())])
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let envelope: ProgressEnvelope = response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        if !envelope.ok {
            return Err(RemoteError::Api(
                envelope.error.unwrap_or_else(|| "progress fetch rejected".to_string()),
            ));
        }
        Ok(envelope.rows.unwrap_or_default())
    }

    /// Ask the server to validate an answer. Used as the fallback when
    /// the local bundled-answer check misses; the remote verdict wins.
    pub async fn check_answer(&self, puzzle_id: &str, answer: &str) -> Result<Verdict, RemoteError> {
        let response = self
            .http
            .post(format!("{}/submit", self.base_url))
            .json(&serde_json::json!({ "puzzleId": puzzle_id, "answer": answer }))
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }

    /// Persist a solve. At-most-once: callers spawn this and drop the
    /// error after logging; there is no retry.
    pub async fn record_solve(
        &self,
        puzzle_id: &str,
        answer: &str,
        meta: serde_json::Value,
    ) -> Result<(), RemoteError> {
        let body = serde_json::json!({
            "playerId": self.player_id,
            "puzzleId": puzzle_id,
            "answer": answer,
            "meta": meta,
        });

        let response = self
            .http
            .post(format!("{}/progress", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        let envelope: OkEnvelope = response
            .json()
            .await
            .map_err(|e| RemoteError::Parse(e.to_string()))?;

        if !envelope.ok {
            return Err(RemoteError::Api(format!(
                "record rejected (HTTP {status}): {}",
                envelope.error.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

// Progress store operations
//
// The store speaks the external key-value contract: one record per
// solve under progress:{playerId}:{puzzleId}, plus a per-player index
// set under progress:{playerId}:set listing those record keys. Reads
// trust the index; the clear operation reconciles both directions.

use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};

/// Record key for a player's solve of one puzzle.
pub fn record_key(player_id: &str, puzzle_id: &str) -> String {
    format!("progress:{player_id}:{puzzle_id}")
}

/// The player's index set key.
pub fn set_key(player_id: &str) -> String {
    format!("progress:{player_id}:set")
}

/// Namespace prefix covering every key belonging to a player.
pub fn player_prefix(player_id: &str) -> String {
    format!("progress:{player_id}:")
}

/// Extract the puzzle id from a record key (the segment after the last
/// colon).
pub fn puzzle_id_from_key(key: &str) -> &str {
    key.rsplit(':').next().unwrap_or(key)
}

/// A recorded solve, as served to hydration and the admin surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRow {
    pub puzzle_id: String,
    pub answer: String,
    pub correct: bool,
    pub ts: i64,
    pub meta: Option<serde_json::Value>,
}

/// What a clear actually deleted, phase by phase. `extras_deleted`
/// counts stragglers the index didn't know about.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearReport {
    pub members_found: i64,
    pub members_deleted: i64,
    pub set_deleted: i64,
    pub extras_deleted: i64,
    pub deleted: i64,
}

/// Upsert a solve record and add it to the player's index set.
/// Idempotent: re-recording the same puzzle overwrites the prior
/// answer and timestamp.
pub async fn record_solve(
    pool: &Pool<Sqlite>,
    player_id: &str,
    puzzle_id: &str,
    answer: &str,
    meta: Option<&serde_json::Value>,
) -> Result<(), String> {
    let key = record_key(player_id, puzzle_id);
    let ts = chrono::Utc::now().timestamp_millis();
    let meta_json = meta.map(|m| m.to_string());

    sqlx::query(
        r#"INSERT INTO progress_records (key, answer, correct, ts, meta)
           VALUES (?, ?, 'true', ?, ?)
           ON CONFLICT(key) DO UPDATE SET
             answer = excluded.answer,
             correct = excluded.correct,
             ts = excluded.ts,
             meta = excluded.meta"#,
    )
    .bind(&key)
    .bind(answer)
    .bind(ts)
    .bind(&meta_json)
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to record solve {key}: {e}"))?;

    sqlx::query("INSERT OR IGNORE INTO progress_index (set_key, member) VALUES (?, ?)")
        .bind(set_key(player_id))
        .bind(&key)
        .execute(pool)
        .await
        .map_err(|e| format!("Failed to index solve {key}: {e}"))?;

    Ok(())
}

/// Member keys of a player's index set.
pub async fn index_members(pool: &Pool<Sqlite>, player_id: &str) -> Result<Vec<String>, String> {
    let rows = sqlx::query("SELECT member FROM progress_index WHERE set_key = ? ORDER BY member")
        .bind(set_key(player_id))
        .fetch_all(pool)
        .await
        .map_err(|e| format!("Failed to read index set: {e}"))?;
    Ok(rows.into_iter().map(|r| r.get("member")).collect())
}

/// Every stored record key under `prefix`. This is the pattern-scan
/// primitive the clear sweep is built on. `%` and `_` in the prefix are
/// escaped so player ids can't widen the match.
pub async fn scan_keys(pool: &Pool<Sqlite>, prefix: &str) -> Result<Vec<String>, String> {
    let escaped = prefix
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let rows = sqlx::query(
        "SELECT key FROM progress_records WHERE key LIKE ? ESCAPE '\\' ORDER BY key",
    )
    .bind(format!("{escaped}%"))
    .fetch_all(pool)
    .await
    .map_err(|e| format!("Failed to scan keys: {e}"))?;
    Ok(rows.into_iter().map(|r| r.get("key")).collect())
}

/// List a player's solves, ordered by ascending solve timestamp.
///
/// Reads trust the index set: records that exist but were never indexed
/// are under-reported here until a clear runs. An indexed member whose
/// record has vanished yields a degenerate empty row rather than an
/// error, matching the wire contract.
pub async fn list_solves(pool: &Pool<Sqlite>, player_id: &str) -> Result<Vec<SolveRow>, String> {
    let members = index_members(pool, player_id).await?;

    let mut rows = Vec::with_capacity(members.len());
    for member in members {
        let record = sqlx::query("SELECT answer, correct, ts, meta FROM progress_records WHERE key = ?")
            .bind(&member)
            .fetch_optional(pool)
            .await
            .map_err(|e| format!("Failed to read record {member}: {e}"))?;

        let row = match record {
            Some(r) => SolveRow {
                puzzle_id: puzzle_id_from_key(&member).to_string(),
                answer: r.get("answer"),
                correct: r.get::<String, _>("correct") == "true",
                ts: r.get("ts"),
                meta: r
                    .get::<Option<String>, _>("meta")
                    .and_then(|m| serde_json::from_str(&m).ok()),
            },
            None => SolveRow {
                puzzle_id: puzzle_id_from_key(&member).to_string(),
                answer: String::new(),
                correct: false,
                ts: 0,
                meta: None,
            },
        };
        rows.push(row);
    }

    rows.sort_by_key(|r| r.ts);
    Ok(rows)
}

/// Delete everything belonging to a player.
///
/// Two phases, counted separately so callers can detect drift:
/// index-driven deletion of every member key plus the set key itself,
/// then a full-namespace sweep that removes stragglers the index never
/// knew about. Not transactional; a crash mid-way leaves partial state
/// that the next clear's sweep heals.
pub async fn clear_player(pool: &Pool<Sqlite>, player_id: &str) -> Result<ClearReport, String> {
    let members = index_members(pool, player_id).await?;
    let mut report = ClearReport {
        members_found: members.len() as i64,
        ..ClearReport::default()
    };

    for member in &members {
        let res = sqlx::query("DELETE FROM progress_records WHERE key = ?")
            .bind(member)
            .execute(pool)
            .await
            .map_err(|e| format!("Failed to delete record {member}: {e}"))?;
        report.members_deleted += res.rows_affected() as i64;
    }

    let res = sqlx::query("DELETE FROM progress_index WHERE set_key = ?")
        .bind(set_key(player_id))
        .execute(pool)
        .await
        .map_err(|e| format!("Failed to delete index set: {e}"))?;
    report.set_deleted = if res.rows_affected() > 0 { 1 } else { 0 };

    // Safety sweep: delete any stragglers matching the namespace.
    let extras = scan_keys(pool, &player_prefix(player_id)).await?;
    for key in &extras {
        let res = sqlx::query("DELETE FROM progress_records WHERE key = ?")
            .bind(key)
            .execute(pool)
            .await
            .map_err(|e| format!("Failed to delete straggler {key}: {e}"))?;
        report.extras_deleted += res.rows_affected() as i64;
    }

    report.deleted = report.members_deleted + report.set_deleted + report.extras_deleted;
    Ok(report)
}

/// SQL migration for the initial store schema
///
/// Design principles:
/// - The external key layout (`progress:{playerId}:{puzzleId}` records,
///   `progress:{playerId}:set` index) is stored verbatim so admin
///   tooling round-trips exactly
/// - `correct` stays a text 'true'/'false', matching the wire contract
/// - `meta` is a JSON blob for flexible, rarely-queried fields
pub const MIGRATION_001: &str = r#"
-- =============================================================================
-- Progress records - one row per recorded solve
-- =============================================================================
CREATE TABLE IF NOT EXISTS progress_records (
    key             TEXT PRIMARY KEY,       -- progress:{playerId}:{puzzleId}
    answer          TEXT NOT NULL,
    correct         TEXT NOT NULL DEFAULT 'true',
    ts              INTEGER NOT NULL,       -- solve timestamp, epoch ms
    meta            TEXT                    -- JSON: {title, day}
);

CREATE INDEX IF NOT EXISTS idx_progress_records_ts ON progress_records(ts);

-- =============================================================================
-- Per-player index set - drives enumeration and bulk deletion
-- =============================================================================
CREATE TABLE IF NOT EXISTS progress_index (
    set_key         TEXT NOT NULL,          -- progress:{playerId}:set
    member          TEXT NOT NULL,          -- a progress_records key
    PRIMARY KEY (set_key, member)
);
"#;

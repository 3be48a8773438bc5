// Database initialization and migration handling
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};

use crate::db::migrations::MIGRATION_001;

/// Initialize the store connection pool and bring the schema current.
pub async fn init_db(db_url: &str) -> Result<Pool<Sqlite>, String> {
    log::info!("Initializing progress store at: {db_url}");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await
        .map_err(|e| format!("Failed to connect to store: {e}"))?;

    // Enable WAL mode for better performance
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await
        .map_err(|e| format!("Failed to enable WAL mode: {e}"))?;

    migrate(&pool).await?;

    log::info!("Store initialization complete");

    Ok(pool)
}

/// Run all pending migrations against an existing pool.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), String> {
    // Create migrations table if not exists
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(|e| format!("Failed to create migrations table: {e}"))?;

    let applied: bool =
        sqlx::query("SELECT COUNT(*) as count FROM _migrations WHERE name = 'migration_001'")
            .fetch_one(pool)
            .await
            .map(|row| row.get::<i64, _>("count") > 0)
            .unwrap_or(false);

    if !applied {
        log::info!("Applying migration_001...");

        // Split migration into individual statements (SQLite doesn't support multiple statements)
        for statement in MIGRATION_001.split(';') {
            // Strip leading comments and whitespace
            let mut stmt = statement.trim();
            while stmt.starts_with("--") {
                if let Some(idx) = stmt.find('\n') {
                    stmt = stmt[idx + 1..].trim();
                } else {
                    stmt = "";
                    break;
                }
            }

            if !stmt.is_empty() {
                sqlx::query(stmt)
                    .execute(pool)
                    .await
                    .map_err(|e| format!("Migration failed on statement: {stmt}\nError: {e}"))?;
            }
        }

        sqlx::query(
            "INSERT INTO _migrations (name, applied_at) VALUES ('migration_001', datetime('now'))",
        )
        .execute(pool)
        .await
        .map_err(|e| format!("Failed to record migration: {e}"))?;

        log::info!("Migration 001 applied successfully");
    }

    Ok(())
}

/// Liveness check: a trivial round-trip through the store.
pub async fn ping(pool: &Pool<Sqlite>) -> Result<(), String> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| format!("Store ping failed: {e}"))
}

/// Get store stats for startup logging and debugging
pub async fn get_db_stats(pool: &Pool<Sqlite>) -> Result<DbStats, String> {
    let record_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM progress_records")
        .fetch_one(pool)
        .await
        .map(|row| row.get("count"))
        .unwrap_or(0);

    let index_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM progress_index")
        .fetch_one(pool)
        .await
        .map(|row| row.get("count"))
        .unwrap_or(0);

    Ok(DbStats {
        record_count,
        index_count,
    })
}

#[derive(Debug, serde::Serialize)]
pub struct DbStats {
    pub record_count: i64,
    pub index_count: i64,
}

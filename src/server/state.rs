//! Application State
//!
//! Shared state handed to every handler. The store pool lives behind
//! `Arc<Mutex<Option<...>>>`: it is installed asynchronously after
//! startup and health-checked by each handler, so the HTTP surface can
//! come up before the store does and degrade cleanly if it never does.

use std::sync::Arc;

use sqlx::{Pool, Sqlite};
use tokio::sync::Mutex as TokioMutex;

use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::puzzles::Puzzle;

/// Application state holding the store pool, config, and puzzle catalog
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<TokioMutex<Option<Pool<Sqlite>>>>,
    pub config: Arc<AppConfig>,
    pub puzzles: Arc<Vec<Puzzle>>,
    pub notifier: Option<Arc<Notifier>>,
}

impl AppState {
    pub fn new(config: AppConfig, puzzles: Vec<Puzzle>) -> Self {
        let notifier = Notifier::from_settings(
            config.resend_api_key.as_deref(),
            config.notify_email.as_deref(),
        )
        .map(Arc::new);

        Self {
            db: Arc::new(TokioMutex::new(None)),
            config: Arc::new(config),
            puzzles: Arc::new(puzzles),
            notifier,
        }
    }

    /// Install the store pool once initialization finishes.
    pub async fn install_pool(&self, pool: Pool<Sqlite>) {
        let mut guard = self.db.lock().await;
        *guard = Some(pool);
    }

    /// Current pool, if the store is ready.
    pub async fn pool(&self) -> Option<Pool<Sqlite>> {
        let guard = self.db.lock().await;
        guard.as_ref().cloned()
    }
}

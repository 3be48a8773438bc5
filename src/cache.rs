//! Local Progress Cache
//!
//! Best-effort JSON snapshot of a player's progress on disk. The cache
//! is a convenience, never an authority: load failures fall back to a
//! fresh progress record and save failures are logged and dropped, so a
//! broken disk never blocks play.

use std::path::{Path, PathBuf};

use crate::filmstrip::Progress;

/// Load cached progress. Any failure (missing file, bad JSON) yields
/// `None`.
pub async fn load(path: &Path) -> Option<Progress> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("no progress cache at {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(progress) => Some(progress),
        Err(e) => {
            log::warn!("ignoring corrupt progress cache {}: {}", path.display(), e);
            None
        }
    }
}

/// Save progress. Creates parent directories as needed; failures are
/// logged and swallowed.
pub async fn save(path: &Path, progress: &Progress) {
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            log::debug!("cache dir {} not writable: {}", parent.display(), e);
            return;
        }
    }
    let json = match serde_json::to_string_pretty(progress) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("failed to serialize progress cache: {e}");
            return;
        }
    };
    if let Err(e) = tokio::fs::write(path, json).await {
        log::debug!("failed to write progress cache {}: {}", path.display(), e);
    }
}

/// Default cache location for a player: `~/.daygate/<player>.json`,
/// falling back to the system temp dir without a home.
pub fn default_path(player_id: &str) -> PathBuf {
    let base = std::env::var("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".daygate"))
        .unwrap_or_else(|_| std::env::temp_dir().join("daygate"));
    base.join(format!("{player_id}.json"))
}

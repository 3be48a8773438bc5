//! Application Configuration
//!
//! Everything comes from the environment, with defaults that work for
//! local development. Parse failures are typed errors reported once at
//! startup instead of panics scattered through handlers.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::schedule::Schedule;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}={value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind address for the HTTP surface.
    pub addr: String,
    /// Path of the sqlite store file.
    pub db_path: String,
    /// Shared admin secret; admin routes refuse to run without it.
    pub admin_token: Option<String>,
    /// Launch instant, local wall-clock.
    pub launch_local: NaiveDateTime,
    /// Local hour of day at which each puzzle unlocks.
    pub unlock_hour: u32,
    /// Player recorded when requests omit one.
    pub default_player: String,
    /// Resend API key for solve notifications.
    pub resend_api_key: Option<String>,
    /// Recipient for solve notifications.
    pub notify_email: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let launch_raw =
            env_or("DAYGATE_LAUNCH", "2025-12-01T00:00:00");
        let launch_local = parse_launch(&launch_raw).ok_or_else(|| ConfigError::Invalid {
            name: "DAYGATE_LAUNCH",
            value: launch_raw.clone(),
            reason: "expected an ISO local datetime like 2025-12-01T00:00:00".to_string(),
        })?;

        let hour_raw = env_or("DAYGATE_UNLOCK_HOUR", "0");
        let unlock_hour: u32 = hour_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "DAYGATE_UNLOCK_HOUR",
            value: hour_raw.clone(),
            reason: "expected an integer hour".to_string(),
        })?;
        if unlock_hour > 23 {
            return Err(ConfigError::Invalid {
                name: "DAYGATE_UNLOCK_HOUR",
                value: hour_raw,
                reason: "hour must be 0-23".to_string(),
            });
        }

        Ok(Self {
            addr: env_or("DAYGATE_ADDR", "127.0.0.1:8787"),
            db_path: env_or("DAYGATE_DB", "daygate.db"),
            admin_token: env_nonempty("ADMIN_TOKEN"),
            launch_local,
            unlock_hour,
            default_player: env_or("DAYGATE_DEFAULT_PLAYER", "keenan"),
            resend_api_key: env_nonempty("RESEND_API_KEY"),
            notify_email: env_nonempty("NOTIFY_EMAIL"),
        })
    }

    /// Connection string for the sqlite store, created on first open.
    pub fn db_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.db_path)
    }

    /// The unlock schedule over a catalog of `total_days` puzzles.
    pub fn schedule(&self, total_days: usize) -> Schedule {
        Schedule::new(self.launch_local, self.unlock_hour, total_days)
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_launch(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_launch_forms() {
        assert!(parse_launch("2025-12-01T00:00:00").is_some());
        assert!(parse_launch("2025-12-01 09:30:00").is_some());
        let midnight = parse_launch("2025-12-01").unwrap();
        assert_eq!(midnight.to_string(), "2025-12-01 00:00:00");
        assert!(parse_launch("december").is_none());
    }

    #[test]
    fn test_schedule_from_config() {
        let config = AppConfig {
            addr: "127.0.0.1:0".into(),
            db_path: ":memory:".into(),
            admin_token: None,
            launch_local: parse_launch("2025-11-01T00:00:00").unwrap(),
            unlock_hour: 0,
            default_player: "keenan".into(),
            resend_api_key: None,
            notify_email: None,
        };
        let schedule = config.schedule(15);
        assert_eq!(schedule.total_days, 15);
        assert_eq!(schedule.unlock_hour, 0);
    }
}

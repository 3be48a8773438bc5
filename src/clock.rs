//! Clock Source
//!
//! Everything time-gated in the app resolves "now" through a [`Clock`]
//! instead of reading the wall clock directly, so tests and manual QA
//! can drive the unlock machinery from a supplied instant.
//!
//! An anchored clock does not freeze time: it captures a monotonic
//! reference alongside the override and keeps advancing by elapsed real
//! time, so countdown displays still visibly tick.

use std::time::Instant;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};

/// Resolves the current local wall-clock time.
#[derive(Debug, Clone)]
pub enum Clock {
    /// Real wall clock.
    System,
    /// Test/QA override: `base` plus real time elapsed since capture.
    Anchored { base: NaiveDateTime, captured: Instant },
}

impl Clock {
    pub fn system() -> Self {
        Clock::System
    }

    /// Anchor the clock at `base`, capturing the monotonic reference now.
    pub fn anchored(base: NaiveDateTime) -> Self {
        Clock::Anchored {
            base,
            captured: Instant::now(),
        }
    }

    /// Current local time as seen through this clock.
    pub fn now_local(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Anchored { base, captured } => {
                let elapsed =
                    chrono::Duration::from_std(captured.elapsed()).unwrap_or_default();
                *base + elapsed
            }
        }
    }
}

/// Parse a manual "now" override.
///
/// Accepts epoch milliseconds, ISO date/datetime strings, and common
/// slash-separated date forms (`12/01/2025 13:45`). Returns `None` for
/// anything unrecognizable rather than guessing.
pub fn parse_now_override(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    // Pure number = epoch milliseconds, interpreted in local time.
    if raw.chars().all(|c| c.is_ascii_digit()) {
        let ms: i64 = raw.parse().ok()?;
        return Local
            .timestamp_millis_opt(ms)
            .earliest()
            .map(|dt| dt.naive_local());
    }

    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchored_starts_at_base_and_never_goes_backward() {
        let base = NaiveDate::from_ymd_opt(2025, 11, 3)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        let clock = Clock::anchored(base);

        let first = clock.now_local();
        let second = clock.now_local();

        assert!(first >= base);
        assert!(second >= first);
        // The anchor stays close to base; it advances by real elapsed
        // time, not by jumping to the actual wall clock.
        assert!((first - base).num_seconds() < 5);
    }

    #[test]
    fn parse_iso_datetime() {
        let dt = parse_now_override("2025-11-03T00:00:01").unwrap();
        assert_eq!(dt.to_string(), "2025-11-03 00:00:01");

        let dt = parse_now_override("2025-11-03 14:30").unwrap();
        assert_eq!(dt.to_string(), "2025-11-03 14:30:00");
    }

    #[test]
    fn parse_bare_date_is_midnight() {
        let dt = parse_now_override("2025-12-01").unwrap();
        assert_eq!(dt.to_string(), "2025-12-01 00:00:00");
    }

    #[test]
    fn parse_slash_date() {
        let dt = parse_now_override("12/01/2025 13:45").unwrap();
        assert_eq!(dt.to_string(), "2025-12-01 13:45:00");
    }

    #[test]
    fn parse_garbage_is_none() {
        assert!(parse_now_override("").is_none());
        assert!(parse_now_override("tomorrow").is_none());
        assert!(parse_now_override("99/99/9999").is_none());
    }
}

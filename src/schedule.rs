//! Unlock Calculator
//!
//! Maps (launch datetime, unlock hour, day count, now) onto which days
//! of the calendar are open. All arithmetic is done on local wall-clock
//! fields (adding calendar days, never fixed 24h blocks) so the unlock
//! stays pinned to the configured local hour across DST shifts.

use chrono::{Days, NaiveDateTime, NaiveTime};

/// The unlock schedule for a puzzle run.
#[derive(Debug, Clone)]
pub struct Schedule {
    /// Launch instant in local wall-clock time. Only its date matters;
    /// the time-of-day is replaced by `unlock_hour`.
    pub launch_local: NaiveDateTime,
    /// Local hour of day (0-23) at which each day's puzzle opens.
    pub unlock_hour: u32,
    /// Total number of daily puzzles.
    pub total_days: usize,
}

/// Snapshot of the schedule at a particular instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockStatus {
    /// Days whose unlock instant has passed, in `[0, total_days]`.
    pub unlocked_count: usize,
    /// Most recently unlocked day, `None` before the first unlock.
    pub current_index: Option<usize>,
    /// The next unlock instant, `None` once every day is open.
    pub next_unlock: Option<NaiveDateTime>,
}

/// Display-ready countdown split. Pure projection: the unlock state
/// machine never depends on this, only countdown rendering does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CountdownParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Schedule {
    pub fn new(launch_local: NaiveDateTime, unlock_hour: u32, total_days: usize) -> Self {
        Self {
            launch_local,
            unlock_hour: unlock_hour.min(23),
            total_days,
        }
    }

    fn unlock_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.unlock_hour, 0, 0).expect("unlock hour clamped to 0-23")
    }

    /// Day zero: the launch date at the unlock hour.
    pub fn day_zero(&self) -> NaiveDateTime {
        self.launch_local.date().and_time(self.unlock_time())
    }

    /// The unlock instant of day `i` (zero-based), `None` past the
    /// calendar's representable range.
    pub fn unlock_instant(&self, i: usize) -> Option<NaiveDateTime> {
        self.day_zero().checked_add_days(Days::new(i as u64))
    }

    /// Compute which days are open at `now`.
    pub fn unlock_status(&self, now: NaiveDateTime) -> UnlockStatus {
        let day_zero = self.day_zero();
        if self.total_days == 0 || now < day_zero {
            return UnlockStatus {
                unlocked_count: 0,
                current_index: None,
                next_unlock: (self.total_days > 0).then_some(day_zero),
            };
        }

        // Whole calendar days since day zero, minus one if today's
        // unlock hour hasn't arrived yet.
        let date_diff = (now.date() - day_zero.date()).num_days();
        let elapsed_days = if now.time() >= day_zero.time() {
            date_diff
        } else {
            date_diff - 1
        };
        // now >= day_zero guarantees elapsed_days >= 0 here.
        let elapsed_days = elapsed_days.max(0) as usize;

        let unlocked_count = (elapsed_days + 1).min(self.total_days);
        let current_index = elapsed_days.min(self.total_days - 1);
        let next_unlock = if unlocked_count < self.total_days {
            self.unlock_instant(unlocked_count)
        } else {
            None
        };

        UnlockStatus {
            unlocked_count,
            current_index: Some(current_index),
            next_unlock,
        }
    }

    /// Target instant for the "next unlock in" countdown.
    ///
    /// Before launch this is the first unlock; during the run, the next
    /// local unlock-hour boundary; after the final unlock, the end of
    /// the run (countdown clamps to zero there).
    pub fn next_unlock_target(&self, now: NaiveDateTime) -> NaiveDateTime {
        let day_zero = self.day_zero();
        let end = self.unlock_instant(self.total_days).unwrap_or(day_zero);

        if now < day_zero {
            return day_zero;
        }
        if now >= end {
            return end;
        }

        let today_at = now.date().and_time(self.unlock_time());
        if now >= today_at {
            today_at
                .checked_add_days(Days::new(1))
                .unwrap_or(today_at)
        } else {
            today_at
        }
    }
}

/// Split the time remaining until `target` into days/hours/minutes/
/// seconds, clamped at zero once the target has passed.
pub fn countdown(target: NaiveDateTime, now: NaiveDateTime) -> CountdownParts {
    let total_seconds = (target - now).num_seconds().max(0);
    CountdownParts {
        days: total_seconds / 86_400,
        hours: (total_seconds % 86_400) / 3_600,
        minutes: (total_seconds % 3_600) / 60,
        seconds: total_seconds % 60,
    }
}

//! Clock collaborator for query recency and finding timestamps
//!
//! Search queries carry the current year so that results favour recent
//! documentation over outdated tutorials.

use chrono::{DateTime, Datelike, Local, NaiveDateTime, Utc};
use serde::Serialize;

/// Source of the current time
///
/// Calendar values (the query year and the report dates) all come from
/// [`Clock::local_now`], so they always agree with each other.
pub trait Clock: Send + Sync {
    /// Current instant, used for finding timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock time in the local time zone
    fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&Local).naive_local()
    }

    /// Current calendar year
    fn current_year(&self) -> i32 {
        self.local_now().year()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant; its calendar is UTC
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock that always reports `at`
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn local_now(&self) -> NaiveDateTime {
        self.at.naive_utc()
    }
}

/// Date formats used in queries and report headers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeInfo {
    /// "2026"
    pub year: String,
    /// "26"
    pub year_short: String,
    /// "February 2026"
    pub month_year: String,
    /// "Q1 2026"
    pub quarter: String,
    /// "2026-02-08"
    pub date_iso: String,
    /// Appended to search queries: "2026"
    pub search_suffix: String,
    /// "2026-02-08 09:30:00"
    pub full_datetime: String,
}

impl TimeInfo {
    /// Build the time info for a local wall-clock time
    pub fn at(local: NaiveDateTime) -> Self {
        Self {
            year: local.format("%Y").to_string(),
            year_short: local.format("%y").to_string(),
            month_year: local.format("%B %Y").to_string(),
            quarter: format!("Q{} {}", (local.month() - 1) / 3 + 1, local.year()),
            date_iso: local.format("%Y-%m-%d").to_string(),
            search_suffix: local.format("%Y").to_string(),
            full_datetime: local.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Build the time info from a clock
    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::at(clock.local_now())
    }
}

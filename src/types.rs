/// Core type definitions for the banking calendar
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of advancing to a banking day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankingDay {
    /// Start of business (Eastern) on the resolved banking day
    pub date: DateTime<Utc>,
    /// Most recent federal holiday skipped over during the walk
    pub holiday: Option<&'static str>,
}

/// Options for `next_banking_day`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceOptions {
    /// Snap the reference instant to start of business before walking.
    /// When false the reference instant is used as the anchor as-is and the
    /// result keeps its Eastern wall-clock time.
    pub use_business_hours: bool,
}

impl Default for AdvanceOptions {
    fn default() -> Self {
        AdvanceOptions {
            use_business_hours: true,
        }
    }
}

/// DST start/end instants for one calendar year (U.S. Eastern)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DstBoundaries {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DstBoundaries {
    /// DST covers `[start, end)`; the end instant is already standard time
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Calendar configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,

    // Business hours (Eastern, whole hours)
    pub business_open_hour: u32,
    pub business_close_hour: u32,
    pub use_business_hours: bool,

    // Limits
    pub max_walk_days: u32,
    pub dst_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            business_open_hour: 9,
            business_close_hour: 17,
            use_business_hours: true,
            max_walk_days: 3650,
            dst_cache_capacity: 64,
        }
    }
}

impl Config {
    /// Length of the business day in hours
    pub fn business_day_hours(&self) -> i64 {
        i64::from(self.business_close_hour) - i64::from(self.business_open_hour)
    }

    pub fn advance_options(&self) -> AdvanceOptions {
        AdvanceOptions {
            use_business_hours: self.use_business_hours,
        }
    }
}

//! Next U.S. banking day per the Federal Reserve holiday calendar.
//!
//! Holidays falling on Sunday are observed the following Monday. Holidays falling
//! on Saturday are not moved to Friday (Reserve Banks stay open), which is where
//! this calendar differs from the federal-employee one. Everything is anchored to
//! U.S. Eastern time; results are start of business (9:00 AM) Eastern.

pub mod config;
pub mod error;
pub mod time;
pub mod types;

use std::sync::OnceLock;

use chrono::{DateTime, Utc};

pub use error::{BankdayError, Result};
pub use time::FedCalendar;
pub use types::*;

/// Calendar over the built-in Fed table with default limits
pub fn default_calendar() -> &'static FedCalendar {
    static DEFAULT: OnceLock<FedCalendar> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        FedCalendar::new(Config::default()).expect("built-in Fed holiday table is valid")
    })
}

/// DST start for `year`: 2nd Sunday of March, 02:00 Eastern (06:00 UTC)
pub fn get_dst_start(year: i32) -> DateTime<Utc> {
    default_calendar().dst_start(year)
}

/// DST end for `year`: 1st Sunday of November, 02:00 at -05:00 (07:00 UTC)
pub fn get_dst_end(year: i32) -> DateTime<Utc> {
    default_calendar().dst_end(year)
}

pub fn is_dst_active(date: DateTime<Utc>) -> bool {
    default_calendar().is_dst_active(date)
}

pub fn check_if_fed_bank_holiday(date: DateTime<Utc>) -> Option<&'static str> {
    default_calendar().check_if_fed_bank_holiday(date)
}

pub fn check_if_banking_day(date: DateTime<Utc>) -> (bool, Option<&'static str>) {
    default_calendar().check_if_banking_day(date)
}

pub fn is_banking_day(date: DateTime<Utc>) -> bool {
    default_calendar().is_banking_day(date)
}

/// See [`FedCalendar::next_banking_day`]
pub fn next_banking_day(
    date: DateTime<Utc>,
    count: u32,
    options: AdvanceOptions,
) -> Result<BankingDay> {
    default_calendar().next_banking_day(date, count, options)
}

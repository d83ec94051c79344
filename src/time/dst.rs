/// U.S. Eastern daylight saving boundaries (rules in force since 2007)
use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::America::New_York;
use tracing::debug;

use crate::time::holidays::nth_weekday_of_month;
use crate::types::DstBoundaries;

/// Clocks change at 02:00 local time
const TRANSITION_HOUR: u32 = 2;

/// Eastern Daylight Time offset in hours
pub const EDT_OFFSET_HOURS: i32 = -4;
/// Eastern Standard Time offset in hours
pub const EST_OFFSET_HOURS: i32 = -5;

/// DST start: 02:00 (-04:00) on the 2nd Sunday of March
pub fn dst_start(year: i32) -> DateTime<Utc> {
    let day = nth_weekday_of_month(year, 3, Weekday::Sun, 2);
    transition_instant(day, EDT_OFFSET_HOURS)
}

/// DST end: 02:00 (-05:00) on the 1st Sunday of November
pub fn dst_end(year: i32) -> DateTime<Utc> {
    let day = nth_weekday_of_month(year, 11, Weekday::Sun, 1);
    transition_instant(day, EST_OFFSET_HOURS)
}

pub fn dst_boundaries(year: i32) -> DstBoundaries {
    DstBoundaries {
        start: dst_start(year),
        end: dst_end(year),
    }
}

// The 2nd Sunday of March and 1st Sunday of November always exist, so `day` is
// only `None` for years chrono cannot represent.
fn transition_instant(day: Option<NaiveDate>, offset_hours: i32) -> DateTime<Utc> {
    day.and_then(|d| d.and_hms_opt(TRANSITION_HOUR, 0, 0))
        .zip(FixedOffset::east_opt(offset_hours * 3600))
        .and_then(|(local, offset)| offset.from_local_datetime(&local).single())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Per-year memo of DST boundaries.
///
/// Bounded: once `capacity` years are cached, the year farthest from the one being
/// inserted is evicted, so a long-lived process scanning many years stays small.
#[derive(Debug)]
pub struct DstCache {
    capacity: usize,
    entries: Mutex<HashMap<i32, DstBoundaries>>,
}

impl DstCache {
    pub fn new(capacity: usize) -> Self {
        DstCache {
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, year: i32) -> DstBoundaries {
        // Entries are plain values, so a poisoned lock still holds valid data
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(boundaries) = entries.get(&year) {
            return *boundaries;
        }

        if entries.len() >= self.capacity {
            if let Some(evict) = entries.keys().copied().max_by_key(|y| (y - year).abs()) {
                debug!("DST cache full, evicting year {}", evict);
                entries.remove(&evict);
            }
        }

        let boundaries = dst_boundaries(year);
        entries.insert(year, boundaries);
        boundaries
    }

    /// True iff `instant` lies in `[dst_start, dst_end)` of its Eastern calendar year
    pub fn is_dst_active(&self, instant: DateTime<Utc>) -> bool {
        let year = instant.with_timezone(&New_York).year();
        self.get(year).contains(instant)
    }

    /// Eastern UTC offset, in hours, that business hours are anchored to
    pub fn business_offset_hours(&self, instant: DateTime<Utc>) -> i32 {
        if self.is_dst_active(instant) {
            EDT_OFFSET_HOURS
        } else {
            EST_OFFSET_HOURS
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

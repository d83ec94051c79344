/// Business session anchoring in U.S. Eastern time
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;

use crate::time::dst::{DstCache, EST_OFFSET_HOURS};
use crate::types::Config;

/// Calendar date of an instant in U.S. Eastern time
pub fn eastern_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&New_York).date_naive()
}

/// Eastern wall-clock position the walk starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// Eastern offset (hours) in effect at the reference instant
    pub offset_hours: i32,
}

/// `date` + `time` local at a fixed UTC offset
pub fn local_instant(date: NaiveDate, time: NaiveTime, offset_hours: i32) -> Option<DateTime<Utc>> {
    let offset = FixedOffset::east_opt(offset_hours * 3600)?;
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Eastern offset in force on `date`, read at noon.
///
/// Clocks only change early on Sunday mornings, so for any weekday the offset
/// at noon holds for the whole day.
pub fn offset_on(date: NaiveDate, dst: &DstCache) -> i32 {
    NaiveTime::from_hms_opt(12, 0, 0)
        .and_then(|noon| local_instant(date, noon, EST_OFFSET_HOURS))
        .map(|instant| dst.business_offset_hours(instant))
        .unwrap_or(EST_OFFSET_HOURS)
}

/// Anchor `reference` to start of business.
///
/// After close it moves to the next calendar day's open, otherwise to the same
/// day's open. Weekends and holidays are left to the walk.
pub fn anchor_to_business_hours(
    reference: DateTime<Utc>,
    config: &Config,
    dst: &DstCache,
) -> Option<Anchor> {
    let offset_hours = dst.business_offset_hours(reference);
    let today = eastern_date(reference);
    let close = local_instant(
        today,
        NaiveTime::from_hms_opt(config.business_close_hour, 0, 0)?,
        offset_hours,
    )?;

    let date = if reference > close { today.succ_opt()? } else { today };

    Some(Anchor {
        date,
        time: NaiveTime::from_hms_opt(config.business_open_hour, 0, 0)?,
        offset_hours,
    })
}

/// Use the Eastern wall-clock time of `reference` itself as the anchor
pub fn literal_anchor(reference: DateTime<Utc>, dst: &DstCache) -> Option<Anchor> {
    let offset_hours = dst.business_offset_hours(reference);
    let local = reference
        .naive_utc()
        .checked_add_signed(Duration::hours(i64::from(offset_hours)))?;

    Some(Anchor {
        date: local.date(),
        time: local.time(),
        offset_hours,
    })
}

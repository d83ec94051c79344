/// Federal Reserve holiday resolution
use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::time::rules::{HolidayDef, HolidayIndex};

/// Resolve the nth occurrence of `weekday` in a month.
///
/// Positive `nth` counts from the first of the month (1 = first), negative from
/// the last day (-1 = last). Returns `None` for `nth == 0`, an invalid month, or an
/// occurrence that would fall outside the month.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, nth: i32) -> Option<NaiveDate> {
    if nth == 0 {
        return None;
    }

    let resolved = if nth > 0 {
        // Walk forward to the first matching weekday, then whole weeks
        let mut date = NaiveDate::from_ymd_opt(year, month, 1)?;
        while date.weekday() != weekday {
            date = date.succ_opt()?;
        }
        date.checked_add_signed(Duration::weeks(i64::from(nth - 1)))?
    } else {
        // Last day of the month: day before the first of the next month
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let mut date = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
        while date.weekday() != weekday {
            date = date.pred_opt()?;
        }
        date.checked_sub_signed(Duration::weeks(i64::from(-nth - 1)))?
    };

    (resolved.month() == month && resolved.year() == year).then_some(resolved)
}

/// Date a fixed holiday is observed on in `year`.
///
/// Sunday moves to Monday. Saturday stays on Saturday; it is never shifted back
/// to Friday the way federal-employee holidays are.
pub fn observed_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let nominal = NaiveDate::from_ymd_opt(year, month, day)?;
    match nominal.weekday() {
        Weekday::Sun => nominal.succ_opt(),
        _ => Some(nominal),
    }
}

/// Match a calendar date (Eastern) against the holiday index
pub fn match_fed_holiday(index: &HolidayIndex, date: NaiveDate) -> Option<&'static str> {
    let day_of_month = date.day();
    let day_of_week = date.weekday();

    for rule in index.rules_for_month(date.month()) {
        match rule.def {
            HolidayDef::Floating { weekday, nth } => {
                // Only worth resolving on the right weekday
                if day_of_week == weekday
                    && nth_weekday_of_month(date.year(), rule.month, weekday, nth) == Some(date)
                {
                    return Some(rule.name);
                }
            }
            HolidayDef::Fixed { day } if day == day_of_month => {
                return Some(rule.name);
            }
            HolidayDef::Fixed { day } => {
                if observed_date(date.year(), rule.month, day) == Some(date) {
                    return Some(rule.name);
                }
            }
        }
    }

    None
}

/// Monday through Friday
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Weekday check first; holidays are only looked up for weekdays
pub fn check_banking_date(index: &HolidayIndex, date: NaiveDate) -> (bool, Option<&'static str>) {
    if !is_weekday(date) {
        return (false, None);
    }

    let holiday = match_fed_holiday(index, date);
    (holiday.is_none(), holiday)
}

/// Banking day advancement over the Federal Reserve calendar
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::config::loader::validate_config;
use crate::error::{BankdayError, Result};
use crate::time::dst::DstCache;
use crate::time::holidays::{check_banking_date, match_fed_holiday, nth_weekday_of_month, observed_date};
use crate::time::rules::{HolidayDef, HolidayIndex, HolidayRule, FED_HOLIDAYS};
use crate::time::session::{
    anchor_to_business_hours, eastern_date, literal_anchor, local_instant, offset_on,
};
use crate::types::{AdvanceOptions, BankingDay, Config};

/// Holiday index, DST memo and limits for one calendar
#[derive(Debug)]
pub struct FedCalendar {
    config: Config,
    index: HolidayIndex,
    dst: DstCache,
}

impl FedCalendar {
    /// Calendar over the Federal Reserve holiday table
    pub fn new(config: Config) -> Result<Self> {
        Self::with_rules(config, FED_HOLIDAYS)
    }

    /// Calendar over a custom rule table; fails fast on invalid rules
    pub fn with_rules(config: Config, rules: &[HolidayRule]) -> Result<Self> {
        validate_config(&config)?;
        let index = HolidayIndex::new(rules)?;
        let dst = DstCache::new(config.dst_cache_capacity);

        debug!("Holiday index built with {} rules", index.len());

        Ok(FedCalendar { config, index, dst })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> &HolidayIndex {
        &self.index
    }

    pub fn dst_start(&self, year: i32) -> DateTime<Utc> {
        self.dst.get(year).start
    }

    pub fn dst_end(&self, year: i32) -> DateTime<Utc> {
        self.dst.get(year).end
    }

    pub fn is_dst_active(&self, instant: DateTime<Utc>) -> bool {
        self.dst.is_dst_active(instant)
    }

    /// Holiday matched by the Eastern calendar date of `instant`, if any
    pub fn check_if_fed_bank_holiday(&self, instant: DateTime<Utc>) -> Option<&'static str> {
        match_fed_holiday(&self.index, eastern_date(instant))
    }

    /// `(is_banking_day, matched_holiday)`; holidays are only reported on weekdays
    pub fn check_if_banking_day(&self, instant: DateTime<Utc>) -> (bool, Option<&'static str>) {
        check_banking_date(&self.index, eastern_date(instant))
    }

    pub fn is_banking_day(&self, instant: DateTime<Utc>) -> bool {
        self.check_if_banking_day(instant).0
    }

    /// The `count`-th banking day strictly after `reference`.
    ///
    /// The walk runs over Eastern calendar dates. With business hours on, the
    /// result is 9:00 AM Eastern (or the configured open) on that day; otherwise
    /// it keeps the reference's Eastern wall-clock time. The reported holiday is the last one skipped during the
    /// walk; earlier ones are overwritten.
    pub fn next_banking_day(
        &self,
        reference: DateTime<Utc>,
        count: u32,
        options: AdvanceOptions,
    ) -> Result<BankingDay> {
        if count == 0 {
            return Err(BankdayError::InvalidParameter(
                "count must be >= 1".to_string(),
            ));
        }

        let anchor = if options.use_business_hours {
            anchor_to_business_hours(reference, &self.config, &self.dst)
        } else {
            literal_anchor(reference, &self.dst)
        }
        .ok_or_else(|| BankdayError::InvalidParameter(format!("Cannot anchor {}", reference)))?;

        debug!(
            "Anchored {} to {} {} (UTC{:+})",
            reference, anchor.date, anchor.time, anchor.offset_hours
        );

        let mut found = 0;
        let mut holiday = None;
        let mut day = anchor.date;

        for _ in 0..self.config.max_walk_days {
            day = day.succ_opt().ok_or_else(|| {
                BankdayError::InvalidParameter(format!("{} is out of range", reference))
            })?;

            match check_banking_date(&self.index, day) {
                (true, _) => {
                    found += 1;
                    if found == count {
                        // Same wall-clock time, at the offset in force on that day
                        let date = local_instant(day, anchor.time, offset_on(day, &self.dst))
                            .ok_or_else(|| {
                                BankdayError::InvalidParameter(format!("{} is out of range", reference))
                            })?;

                        return Ok(BankingDay { date, holiday });
                    }
                }
                (false, Some(name)) => {
                    debug!("Skipping {} on {}", name, day);
                    holiday = Some(name);
                }
                (false, None) => {}
            }
        }

        warn!(
            "No banking day found after {} within {} days (count {})",
            reference, self.config.max_walk_days, count
        );

        Err(BankdayError::WalkLimitExceeded {
            limit: self.config.max_walk_days,
            count,
        })
    }

    /// Observed holiday dates in `year`, in calendar order.
    ///
    /// Sunday holidays are listed on the Monday they are observed; Saturday
    /// holidays stay on the Saturday.
    pub fn holidays_in_year(&self, year: i32) -> Vec<(NaiveDate, &'static str)> {
        let mut holidays: Vec<_> = self
            .index
            .iter()
            .filter_map(|rule| {
                let date = match rule.def {
                    HolidayDef::Fixed { day } => observed_date(year, rule.month, day),
                    HolidayDef::Floating { weekday, nth } => {
                        nth_weekday_of_month(year, rule.month, weekday, nth)
                    }
                };
                date.map(|d| (d, rule.name))
            })
            .collect();

        holidays.sort_by_key(|(date, _)| *date);
        holidays
    }

    /// Banking days whose Eastern date is after `start`'s and not after `end`'s
    pub fn banking_days_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
        let last = eastern_date(end);
        let mut day = eastern_date(start);
        let mut count = 0;

        while day < last {
            day = match day.succ_opt() {
                Some(d) => d,
                None => break,
            };
            if check_banking_date(&self.index, day).0 {
                count += 1;
            }
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn calendar() -> FedCalendar {
        FedCalendar::new(Config::default()).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = calendar()
            .next_banking_day(utc("2020-02-24T12:00:00Z"), 0, AdvanceOptions::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "ARG_001");
    }

    #[test]
    fn test_last_skipped_holiday_wins() {
        // Christmas 2020 (Fri) then New Year's Day 2021 (Fri)
        let result = calendar()
            .next_banking_day(utc("2020-12-24T15:00:00Z"), 5, AdvanceOptions::default())
            .unwrap();
        assert_eq!(result.date, utc("2021-01-04T14:00:00Z"));
        assert_eq!(result.holiday, Some("New Year's Day"));
    }

    #[test]
    fn test_holiday_reported_even_when_crossed_early() {
        // Skips Thanksgiving 2020 then keeps walking
        let result = calendar()
            .next_banking_day(utc("2020-11-25T15:00:00Z"), 3, AdvanceOptions::default())
            .unwrap();
        assert_eq!(result.date, utc("2020-12-01T14:00:00Z"));
        assert_eq!(result.holiday, Some("Thanksgiving Day"));
    }

    #[test]
    fn test_without_business_hours_keeps_wall_clock() {
        let options = AdvanceOptions {
            use_business_hours: false,
        };
        let cal = calendar();

        let result = cal.next_banking_day(utc("2020-02-24T12:00:00Z"), 1, options).unwrap();
        assert_eq!(result.date, utc("2020-02-25T12:00:00Z"));

        // After close is not pushed to the next day
        let result = cal.next_banking_day(utc("2020-02-24T23:30:00Z"), 1, options).unwrap();
        assert_eq!(result.date, utc("2020-02-25T23:30:00Z"));

        // 10:00 EST Friday -> 10:00 EDT Monday
        let result = cal.next_banking_day(utc("2020-03-06T15:00:00Z"), 1, options).unwrap();
        assert_eq!(result.date, utc("2020-03-09T14:00:00Z"));
        assert_eq!(result.holiday, None);
    }

    fn assert_banking_day_at(cal: &FedCalendar, result: &BankingDay, expected: &str, local: (u32, u32)) {
        use chrono::Timelike;
        use chrono_tz::America::New_York;

        assert_eq!(result.date, utc(expected));
        assert!(cal.is_banking_day(result.date), "{} is not a banking day", result.date);
        let wall = result.date.with_timezone(&New_York);
        assert_eq!((wall.hour(), wall.minute()), local);
    }

    #[test]
    fn test_late_evening_across_spring_forward() {
        let options = AdvanceOptions {
            use_business_hours: false,
        };
        let cal = calendar();

        // Sat 23:30 EST -> Mon 23:30 EDT, not the Sunday
        let result = cal.next_banking_day(utc("2020-03-07T23:30:00-05:00"), 1, options).unwrap();
        assert_banking_day_at(&cal, &result, "2020-03-10T03:30:00Z", (23, 30));
    }

    #[test]
    fn test_just_after_midnight_across_fall_back() {
        let options = AdvanceOptions {
            use_business_hours: false,
        };
        let cal = calendar();

        // Sat 00:30 EDT -> Mon 00:30 EST, not Tuesday
        let result = cal.next_banking_day(utc("2020-10-31T00:30:00-04:00"), 1, options).unwrap();
        assert_banking_day_at(&cal, &result, "2020-11-02T05:30:00Z", (0, 30));

        // Fri 23:45 EDT -> Mon 23:45 EST
        let result = cal.next_banking_day(utc("2020-10-30T23:45:00-04:00"), 1, options).unwrap();
        assert_banking_day_at(&cal, &result, "2020-11-03T04:45:00Z", (23, 45));
    }

    #[test]
    fn test_midnight_open_across_dst_changes() {
        let config = Config {
            business_open_hour: 0,
            ..Config::default()
        };
        let cal = FedCalendar::new(config).unwrap();

        // Fri 08:00 EDT -> Mon 00:00 EST
        let result = cal
            .next_banking_day(utc("2020-10-30T08:00:00-04:00"), 1, AdvanceOptions::default())
            .unwrap();
        assert_banking_day_at(&cal, &result, "2020-11-02T05:00:00Z", (0, 0));

        // Fri 08:00 EST -> Mon 00:00 EDT
        let result = cal
            .next_banking_day(utc("2020-03-06T08:00:00-05:00"), 1, AdvanceOptions::default())
            .unwrap();
        assert_banking_day_at(&cal, &result, "2020-03-09T04:00:00Z", (0, 0));
    }

    #[test]
    fn test_walk_limit() {
        let config = Config {
            max_walk_days: 7,
            ..Config::default()
        };
        let cal = FedCalendar::new(config).unwrap();

        let err = cal
            .next_banking_day(utc("2020-02-24T12:00:00Z"), 10, AdvanceOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            BankdayError::WalkLimitExceeded { limit: 7, count: 10 }
        ));
    }

    #[test]
    fn test_custom_rules() {
        let rules = [HolidayRule::floating("Last Friday of February", 2, Weekday::Fri, -1)];
        let cal = FedCalendar::with_rules(Config::default(), &rules).unwrap();

        // Presidents' Day is not in this table; Feb 28 2020 is
        let result = cal
            .next_banking_day(utc("2020-02-27T15:00:00Z"), 1, AdvanceOptions::default())
            .unwrap();
        assert_eq!(result.date, utc("2020-03-02T14:00:00Z"));
        assert_eq!(result.holiday, Some("Last Friday of February"));
        assert!(cal.is_banking_day(utc("2020-02-17T15:00:00Z")));
    }

    #[test]
    fn test_invalid_rules_fail_fast() {
        let rules = [HolidayRule::floating("Fifth Monday", 2, Weekday::Mon, 5)];
        assert!(FedCalendar::with_rules(Config::default(), &rules).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            business_open_hour: 18,
            ..Config::default()
        };
        assert!(FedCalendar::new(config).is_err());
    }

    #[test]
    fn test_holidays_in_year() {
        let holidays = calendar().holidays_in_year(2021);
        assert_eq!(holidays.len(), 11);
        assert_eq!(holidays[0], (ymd(2021, 1, 1), "New Year's Day"));
        // Saturday Juneteenth stays on the Saturday
        assert!(holidays.contains(&(ymd(2021, 6, 19), "Juneteenth National Independence Day")));
        assert!(holidays.contains(&(ymd(2021, 7, 5), "Independence Day")));
        assert!(holidays.contains(&(ymd(2021, 12, 25), "Christmas Day")));
        assert!(holidays.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_holidays_in_year_saturday_not_shifted() {
        let holidays = calendar().holidays_in_year(2020);
        assert!(holidays.contains(&(ymd(2020, 7, 4), "Independence Day")));
        assert!(!holidays.iter().any(|(d, _)| *d == ymd(2020, 7, 3)));
    }

    #[test]
    fn test_banking_days_between() {
        let cal = calendar();
        // Fri Feb 14 2020 -> Fri Feb 21: Presidents' Day and the weekend excluded
        assert_eq!(
            cal.banking_days_between(utc("2020-02-14T15:00:00Z"), utc("2020-02-21T15:00:00Z")),
            4
        );
        assert_eq!(
            cal.banking_days_between(utc("2020-02-21T15:00:00Z"), utc("2020-02-14T15:00:00Z")),
            0
        );
        // Same Eastern day
        assert_eq!(
            cal.banking_days_between(utc("2020-02-24T14:00:00Z"), utc("2020-02-25T03:00:00Z")),
            0
        );
    }

    #[test]
    fn test_dst_accessors_use_cache() {
        let cal = calendar();
        assert_eq!(cal.dst_start(2020), utc("2020-03-08T06:00:00Z"));
        assert_eq!(cal.dst_end(2020), utc("2020-11-01T07:00:00Z"));
        assert!(cal.is_dst_active(utc("2020-07-01T00:00:00Z")));
        assert!(!cal.is_dst_active(utc("2020-12-01T00:00:00Z")));
    }
}

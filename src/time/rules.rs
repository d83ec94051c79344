/// Federal Reserve holiday rule table
use chrono::Weekday;

use crate::error::{BankdayError, Result};
use crate::time::holidays::nth_weekday_of_month;

/// How a holiday's date is determined within its month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayDef {
    /// Same day of month every year
    Fixed { day: u32 },
    /// Nth occurrence of a weekday; negative counts from the end of the month
    Floating { weekday: Weekday, nth: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayRule {
    pub name: &'static str,
    pub month: u32,
    pub def: HolidayDef,
}

impl HolidayRule {
    pub const fn fixed(name: &'static str, month: u32, day: u32) -> Self {
        HolidayRule {
            name,
            month,
            def: HolidayDef::Fixed { day },
        }
    }

    pub const fn floating(name: &'static str, month: u32, weekday: Weekday, nth: i32) -> Self {
        HolidayRule {
            name,
            month,
            def: HolidayDef::Floating { weekday, nth },
        }
    }
}

/// Federal Reserve Bank holidays.
///
/// See <https://www.federalreserve.gov/aboutthefed/k8.htm>. Holidays falling on
/// Sunday are observed the following Monday. Holidays falling on Saturday are not
/// moved: Reserve Banks stay open the preceding Friday.
pub const FED_HOLIDAYS: &[HolidayRule] = &[
    HolidayRule::fixed("New Year's Day", 1, 1),
    HolidayRule::floating("Birthday of Martin Luther King Jr.", 1, Weekday::Mon, 3),
    HolidayRule::floating("Washington's Birthday/Presidents' Day", 2, Weekday::Mon, 3),
    HolidayRule::floating("Memorial Day", 5, Weekday::Mon, -1),
    HolidayRule::fixed("Juneteenth National Independence Day", 6, 19),
    HolidayRule::fixed("Independence Day", 7, 4),
    HolidayRule::floating("Labor Day", 9, Weekday::Mon, 1),
    HolidayRule::floating("Columbus Day/Indigenous People's Day", 10, Weekday::Mon, 2),
    HolidayRule::fixed("Veteran's Day", 11, 11),
    HolidayRule::floating("Thanksgiving Day", 11, Weekday::Thu, 4),
    HolidayRule::fixed("Christmas Day", 12, 25),
];

/// First year the current DST rules (and this table) apply to
pub const FIRST_SUPPORTED_YEAR: i32 = 2007;

/// Years checked when validating floating rules (one full 28-year weekday cycle)
const VALIDATION_YEARS: std::ops::Range<i32> = FIRST_SUPPORTED_YEAR..FIRST_SUPPORTED_YEAR + 28;

/// Holiday rules grouped by month, in table order
#[derive(Debug, Clone)]
pub struct HolidayIndex {
    by_month: [Vec<HolidayRule>; 12],
}

impl HolidayIndex {
    /// Validate the rules and group them by month
    pub fn new(rules: &[HolidayRule]) -> Result<Self> {
        let mut by_month: [Vec<HolidayRule>; 12] = Default::default();

        for (i, rule) in rules.iter().enumerate() {
            validate_rule(rule)?;

            if rules[..i].iter().any(|r| r.name == rule.name) {
                return Err(invalid(rule, "duplicate name".to_string()));
            }

            by_month[(rule.month - 1) as usize].push(*rule);
        }

        Ok(HolidayIndex { by_month })
    }

    /// Rules for a month (1-12); empty for anything else
    pub fn rules_for_month(&self, month: u32) -> &[HolidayRule] {
        match month {
            1..=12 => &self.by_month[(month - 1) as usize],
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &HolidayRule> {
        self.by_month.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_month.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn validate_rule(rule: &HolidayRule) -> Result<()> {
    if !(1..=12).contains(&rule.month) {
        return Err(invalid(rule, format!("month {} out of range", rule.month)));
    }

    match rule.def {
        HolidayDef::Fixed { day } => {
            // Feb 29 would silently vanish three years out of four
            let max_day = match rule.month {
                2 => 28,
                4 | 6 | 9 | 11 => 30,
                _ => 31,
            };
            if day == 0 || day > max_day {
                return Err(invalid(rule, format!("day {} out of range", day)));
            }
            // A Sunday occurrence would be observed in the next month
            if day == max_day {
                return Err(invalid(rule, format!("day {} is the last day of the month", day)));
            }
        }
        HolidayDef::Floating { weekday, nth } => {
            for year in VALIDATION_YEARS {
                if nth_weekday_of_month(year, rule.month, weekday, nth).is_none() {
                    return Err(invalid(
                        rule,
                        format!("occurrence {} of {:?} does not exist in {}", nth, weekday, year),
                    ));
                }
            }
        }
    }

    Ok(())
}

fn invalid(rule: &HolidayRule, reason: String) -> BankdayError {
    BankdayError::InvalidRule {
        name: rule.name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fed_table_is_valid() {
        let index = HolidayIndex::new(FED_HOLIDAYS).unwrap();
        assert_eq!(index.len(), 11);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_grouping_keeps_table_order() {
        let index = HolidayIndex::new(FED_HOLIDAYS).unwrap();

        let november: Vec<_> = index.rules_for_month(11).iter().map(|r| r.name).collect();
        assert_eq!(november, vec!["Veteran's Day", "Thanksgiving Day"]);

        assert!(index.rules_for_month(3).is_empty());
        assert!(index.rules_for_month(0).is_empty());
        assert!(index.rules_for_month(13).is_empty());
    }

    #[test]
    fn test_rejects_fifth_weekday() {
        let rules = [HolidayRule::floating("Fifth Friday", 2, Weekday::Fri, 5)];
        let err = HolidayIndex::new(&rules).unwrap_err();
        assert_eq!(err.error_code(), "RULE_001");
    }

    #[test]
    fn test_rejects_zero_nth() {
        let rules = [HolidayRule::floating("Zeroth Monday", 3, Weekday::Mon, 0)];
        assert!(HolidayIndex::new(&rules).is_err());
    }

    #[test]
    fn test_rejects_bad_fixed_dates() {
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Nope", 4, 31)]).is_err());
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Leap", 2, 29)]).is_err());
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Month", 13, 1)]).is_err());
    }

    #[test]
    fn test_rejects_month_end_fixed_dates() {
        // Jan 31 2021 is a Sunday; its Monday observance falls in February
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Month End", 1, 31)]).is_err());
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Month End", 2, 28)]).is_err());
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Month End", 9, 30)]).is_err());
        assert!(HolidayIndex::new(&[HolidayRule::fixed("Day Before", 1, 30)]).is_ok());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let rules = [
            HolidayRule::fixed("Twice", 1, 2),
            HolidayRule::fixed("Twice", 8, 2),
        ];
        assert!(HolidayIndex::new(&rules).is_err());
    }
}

//! Calendar-month bill periods.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::BillingError;

/// A calendar month that bills are raised for, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BillPeriod {
    year: i32,
    month: u32,
}

impl BillPeriod {
    /// Creates a period, validating the month.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMonth` if `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, BillingError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(BillingError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Returns the period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Year of the period.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month of the period (1..=12).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following month.
    #[must_use]
    pub const fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns true if `date` falls inside the month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Due date for a bill of this period, clamping `due_day` to the month's end.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDueDay` if `due_day` is outside 1..=31.
    pub fn due_date(&self, due_day: u32) -> Result<NaiveDate, BillingError> {
        if !(1..=31).contains(&due_day) {
            return Err(BillingError::InvalidDueDay(due_day));
        }
        let last = self.last_day();
        Ok(NaiveDate::from_ymd_opt(self.year, self.month, due_day).unwrap_or(last))
    }
}

impl fmt::Display for BillPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for BillPeriod {
    type Err = BillingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BillingError::InvalidPeriod(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for BillPeriod {
    type Error = BillingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillPeriod> for String {
    fn from(period: BillPeriod) -> Self {
        period.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let period: BillPeriod = "2024-03".parse().unwrap();
        assert_eq!(period.year(), 2024);
        assert_eq!(period.month(), 3);
        assert_eq!(period.to_string(), "2024-03");
    }

    #[rstest]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("2024-3")]
    #[case("24-03")]
    #[case("2024/03")]
    #[case("march")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(input.parse::<BillPeriod>().is_err());
    }

    #[rstest]
    #[case(2024, 2, 29)]
    #[case(2023, 2, 28)]
    #[case(2024, 4, 30)]
    #[case(2024, 12, 31)]
    fn test_last_day(#[case] year: i32, #[case] month: u32, #[case] last: u32) {
        let period = BillPeriod::new(year, month).unwrap();
        assert_eq!(period.first_day(), date(year, month, 1));
        assert_eq!(period.last_day(), date(year, month, last));
    }

    #[test]
    fn test_next_wraps_year() {
        let period = BillPeriod::new(2024, 12).unwrap();
        assert_eq!(period.next(), BillPeriod::new(2025, 1).unwrap());
    }

    #[test]
    fn test_contains_and_containing() {
        let period = BillPeriod::containing(date(2024, 5, 17));
        assert_eq!(period.to_string(), "2024-05");
        assert!(period.contains(date(2024, 5, 31)));
        assert!(!period.contains(date(2024, 6, 1)));
    }

    #[test]
    fn test_due_date_clamps_to_month_end() {
        let feb = BillPeriod::new(2023, 2).unwrap();
        assert_eq!(feb.due_date(10).unwrap(), date(2023, 2, 10));
        assert_eq!(feb.due_date(31).unwrap(), date(2023, 2, 28));
        assert!(feb.due_date(0).is_err());
        assert!(feb.due_date(32).is_err());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let a = BillPeriod::new(2023, 12).unwrap();
        let b = BillPeriod::new(2024, 1).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_as_string() {
        let period = BillPeriod::new(2024, 7).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2024-07\"");
        let back: BillPeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
        assert!(serde_json::from_str::<BillPeriod>("\"2024-7\"").is_err());
    }
}

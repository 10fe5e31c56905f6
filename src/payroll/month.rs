use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Payroll month key, rendered as `YYYY-MM`.
///
/// Construction always validates, so the calendar window helpers below are
/// total. Years are restricted to 1900..=9999 to keep the key sortable as
/// text, which is how the payments table groups by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidMonth(pub String);

impl fmt::Display for InvalidMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month '{}': expected YYYY-MM", self.0)
    }
}

impl std::error::Error for InvalidMonth {}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1900..=9999).contains(&year) && (1..=12).contains(&month) {
            Some(YearMonth { year, month })
        } else {
            None
        }
    }

    /// The month a calendar date falls in.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated on construction")
    }

    pub fn last_day(self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .expect("validated on construction")
            .pred_opt()
            .expect("month start has a predecessor")
    }

    /// Calendar days in the month (the `totalDays` of a salary snapshot).
    pub fn days_in_month(self) -> u32 {
        self.last_day().day()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.split_once('-').ok_or_else(|| InvalidMonth(s.to_string()))?;
        let year: i32 = year.parse().map_err(|_| InvalidMonth(s.to_string()))?;
        let month: u32 = month.parse().map_err(|_| InvalidMonth(s.to_string()))?;
        YearMonth::new(year, month).ok_or_else(|| InvalidMonth(s.to_string()))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = InvalidMonth;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> String {
        ym.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_normalized() {
        let ym: YearMonth = "2026-08".parse().unwrap();
        assert_eq!(ym.year(), 2026);
        assert_eq!(ym.month(), 8);
        assert_eq!(ym.to_string(), "2026-08");
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("2026".parse::<YearMonth>().is_err());
        assert!("2026-13".parse::<YearMonth>().is_err());
        assert!("2026-00".parse::<YearMonth>().is_err());
        assert!("08-2026".parse::<YearMonth>().is_err());
        assert!("abcd-ef".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn month_window_covers_whole_month() {
        let ym = YearMonth::new(2026, 2).unwrap();
        assert_eq!(ym.first_day(), NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
        assert_eq!(ym.last_day(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(ym.days_in_month(), 28);

        let leap = YearMonth::new(2024, 2).unwrap();
        assert_eq!(leap.days_in_month(), 29);

        let december = YearMonth::new(2025, 12).unwrap();
        assert_eq!(december.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
        assert_eq!(december.days_in_month(), 31);
    }

    #[test]
    fn of_takes_the_containing_month() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 14).unwrap();
        assert_eq!(YearMonth::of(date), YearMonth::new(2026, 8).unwrap());
    }

    #[test]
    fn serde_round_trips_as_string() {
        let ym: YearMonth = serde_json::from_str("\"2026-08\"").unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2026-08\"");
        assert!(serde_json::from_str::<YearMonth>("\"2026-15\"").is_err());
    }
}

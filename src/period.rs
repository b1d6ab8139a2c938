use chrono::{Datelike, Month, NaiveDate};
use std::{fmt, str::FromStr};

use crate::error::ScheduleError;

/// A calendar month, the unit every payment is tagged with.
///
/// Months are not range-checked on construction. Only the `YYYY-MM` parser
/// rejects impossible months; values built directly are used as given by the
/// engine, but a month outside 1-12 fails to serialize since it could not be
/// read back.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(try_from = "String")
)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: &NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Following month, rolling December over into January of the next year.
    pub fn next(&self) -> Self {
        let month = self.month + 1;
        if month > 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, month)
        }
    }

    pub fn is_december(&self) -> bool {
        self.month == 12
    }

    /// English month name, e.g. "January".
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
            .map_err(|e| ScheduleError::InvalidPeriod(format!("'{}': {}", s, e)))?;
        Ok(Self::from_date(&date))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_valid() {
            return Err(serde::ser::Error::custom(format!(
                "month {} of {} is outside 1-12",
                self.month, self.year
            )));
        }
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::YearMonth;
    use chrono::NaiveDate;
    use test_log::test;

    #[test]
    fn test_next_month() {
        assert_eq!(YearMonth::new(2024, 1).next(), YearMonth::new(2024, 2));
        assert_eq!(YearMonth::new(2024, 11).next(), YearMonth::new(2024, 12));
        assert_eq!(YearMonth::new(2024, 12).next(), YearMonth::new(2025, 1));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(YearMonth::new(2024, 1).month_name(), "January");
        assert_eq!(YearMonth::new(2024, 6).month_name(), "June");
        assert_eq!(YearMonth::new(2024, 12).month_name(), "December");
        assert_eq!(YearMonth::new(2024, 13).month_name(), "Unknown");
    }

    #[test]
    fn test_parse_and_format() {
        let period: YearMonth = "2024-06".parse().unwrap();
        assert_eq!(period, YearMonth::new(2024, 6));
        assert_eq!(period.to_string(), "2024-06");
        assert_eq!(" 1999-12 ".parse::<YearMonth>().unwrap(), YearMonth::new(1999, 12));

        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("June 2024".parse::<YearMonth>().is_err());
        assert!("".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_from_date_and_validity() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        assert_eq!(YearMonth::from_date(&date), YearMonth::new(2024, 2));
        assert!(YearMonth::new(2024, 12).is_valid());
        assert!(!YearMonth::new(2024, 0).is_valid());
        assert!(!YearMonth::new(2024, 13).is_valid());
    }

    #[test]
    fn test_ordering() {
        assert!(YearMonth::new(2024, 12) < YearMonth::new(2025, 1));
        assert!(YearMonth::new(2024, 2) > YearMonth::new(2024, 1));
    }
}

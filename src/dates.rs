use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A year-independent calendar day such as 25 March.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Accepts any day that exists in a leap year, so 29 February is valid.
    pub fn new(month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.day() == self.day
    }

    /// Sortable `month * 100 + day` key used for range comparisons.
    pub fn ordinal_key(&self) -> u32 {
        self.month * 100 + self.day
    }

    /// This day in `year`; `None` for 29 February outside leap years.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }

    /// Inclusive containment, wrapping over New Year when `start` sorts after `end`.
    pub fn range_contains(start: MonthDay, end: MonthDay, date: NaiveDate) -> bool {
        let key = MonthDay::of(date).ordinal_key();
        let (start, end) = (start.ordinal_key(), end.ordinal_key());
        if start <= end {
            key >= start && key <= end
        } else {
            key >= start || key <= end
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.day)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month/day key '{0}'")]
pub struct ParseMonthDayError(String);

impl FromStr for MonthDay {
    type Err = ParseMonthDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthDayError(s.to_string());
        let (month, day) = s.trim().split_once('/').ok_or_else(err)?;
        let month = month.parse().map_err(|_| err())?;
        let day = day.parse().map_err(|_| err())?;
        MonthDay::new(month, day).ok_or_else(err)
    }
}

/// Weekday numbering used by the data tables: 0 = Sunday .. 6 = Saturday.
pub fn weekday_number(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

pub fn weekday_from_number(number: u8) -> Option<Weekday> {
    match number {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Serde adapter storing a `Weekday` as its Sunday-based number.
pub mod weekday_serde {
    use super::{weekday_from_number, weekday_number};
    use chrono::Weekday;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(weekday_number(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let number = u8::deserialize(deserializer)?;
        weekday_from_number(number)
            .ok_or_else(|| D::Error::custom(format!("weekday {number} is outside 0..=6")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_slash_keys() {
        assert_eq!("3/25".parse::<MonthDay>().unwrap(), MonthDay { month: 3, day: 25 });
        assert_eq!("2/29".parse::<MonthDay>().unwrap().to_string(), "2/29");
        assert!("2/30".parse::<MonthDay>().is_err());
        assert!("13/1".parse::<MonthDay>().is_err());
        assert!("march 25".parse::<MonthDay>().is_err());
    }

    #[test]
    fn range_wraps_over_new_year() {
        let start = MonthDay::new(12, 25).unwrap();
        let end = MonthDay::new(1, 4).unwrap();
        assert!(MonthDay::range_contains(start, end, d(2026, 12, 31)));
        assert!(MonthDay::range_contains(start, end, d(2027, 1, 4)));
        assert!(!MonthDay::range_contains(start, end, d(2027, 1, 5)));
        assert!(!MonthDay::range_contains(start, end, d(2026, 12, 24)));
    }

    #[test]
    fn leap_day_only_exists_in_leap_years() {
        let leap = MonthDay::new(2, 29).unwrap();
        assert_eq!(leap.in_year(2028), Some(d(2028, 2, 29)));
        assert_eq!(leap.in_year(2027), None);
    }

    #[test]
    fn weekday_numbers_start_on_sunday() {
        assert_eq!(weekday_number(Weekday::Sun), 0);
        assert_eq!(weekday_number(Weekday::Sat), 6);
        assert_eq!(weekday_from_number(3), Some(Weekday::Wed));
        assert_eq!(weekday_from_number(7), None);
    }
}

//! Calendar day type used for every date in the system.
//!
//! Dates are pure Gregorian days with no time of day and no timezone, so day
//! arithmetic is integer arithmetic and never drifts across DST changes.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A date string that is not a valid `YYYYMMDD` calendar day.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid date {0:?}: expected YYYYMMDD")]
pub struct InvalidDay(pub String);

/// A calendar day, written as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(NaiveDate);

impl Day {
    /// 1970-01-01, the date of the vacant snapshot that precedes every timeline.
    pub fn epoch() -> Self {
        Self(NaiveDate::default())
    }

    /// Creates a day from year, month and day-of-month.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The following calendar day.
    #[must_use]
    pub fn succ(self) -> Self {
        Self(self.0.checked_add_days(Days::new(1)).unwrap_or(self.0))
    }

    /// The preceding calendar day.
    #[must_use]
    pub fn pred(self) -> Self {
        Self(self.0.checked_sub_days(Days::new(1)).unwrap_or(self.0))
    }

    /// Number of days from `self` to `end`, counting both ends.
    pub fn days_through(self, end: Self) -> i64 {
        (end.0 - self.0).num_days() + 1
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl FromStr for Day {
    type Err = InvalidDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidDay(s.to_string());
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year = s[0..4].parse().map_err(|_| invalid())?;
        let month = s[4..6].parse().map_err(|_| invalid())?;
        let day = s[6..8].parse().map_err(|_| invalid())?;
        Self::from_ymd(year, month, day).ok_or_else(invalid)
    }
}

impl Serialize for Day {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DayVisitor;

        impl Visitor<'_> for DayVisitor {
            type Value = Day;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a YYYYMMDD date as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Day, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Day, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Day, E> {
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(DayVisitor)
    }
}

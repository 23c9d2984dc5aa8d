//! Calendar month value type.
//!
//! A [`Month`] is a (year, month) pair with no day or time component,
//! formatted and parsed as `YYYY-MM`. The all-zero value is a sentinel for
//! "unset"; month reports and allocation operations reject it up front so a
//! missing query parameter never silently reads as year 0.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month, ordered by (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// The "unset" sentinel.
    pub const ZERO: Self = Self { year: 0, month: 0 };

    /// Creates a month from a year and a 1-based month number.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Extracts the month a date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year component.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The 1-based month component.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Whether this is the "unset" sentinel.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.year == 0 && self.month == 0
    }

    /// Offsets this month by `n` calendar months, wrapping year boundaries
    /// in both directions.
    #[must_use]
    pub const fn add_months(self, n: i32) -> Self {
        let total = self.year * 12 + self.month as i32 - 1 + n;
        Self {
            year: total.div_euclid(12),
            month: total.rem_euclid(12) as u32 + 1,
        }
    }

    /// The first day of this month.
    ///
    /// Fails with [`Error::UnsetMonth`] for the zero sentinel (and any other
    /// value that does not name a calendar month), so every date-ranged query
    /// downstream inherits the zero-month guard.
    pub fn first_day(self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).ok_or(Error::UnsetMonth)
    }

    /// The half-open date range `[first day, first day of next month)`
    /// covering this month.
    pub fn date_range(self) -> Result<(NaiveDate, NaiveDate)> {
        let start = self.first_day()?;
        let end = self.add_months(1).first_day()?;
        Ok((start, end))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            input: s.to_string(),
        };

        let (year_part, month_part) = s.split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        // Year zero and the 0001-01 calendar epoch are sentinels for "unset"
        // in imported data, not addressable months.
        if year == 0 || (year == 1 && month == 1) {
            return Err(invalid());
        }

        Ok(Self { year, month })
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

//! Calendar dates attached to facts.
//!
//! Campaign records date facts either to a month (`2025-03`) or to a day
//! (`2025-03-14`). A month-precision date stands for the first day of that
//! month. The precision is kept so that a date prints back the way it was
//! written.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How precisely a [`FactDate`] was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePrecision {
    /// `YYYY-MM`
    Month,
    /// `YYYY-MM-DD`
    Day,
}

/// A date on the campaign calendar.
///
/// Comparisons between dates go through [`FactDate::date`]; two dates with
/// different precision but the same first day compare as the same instant
/// while still being distinct values.
///
/// # Examples
///
/// ```
/// use chronicle::FactDate;
///
/// let march: FactDate = "2025-03".parse().unwrap();
/// let ides: FactDate = "2025-03-15".parse().unwrap();
/// assert!(march.date() < ides.date());
/// assert_eq!(march.to_string(), "2025-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FactDate {
    date: NaiveDate,
    precision: DatePrecision,
}

impl FactDate {
    /// Creates a month-precision date. Returns `None` for an invalid month.
    #[must_use]
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|date| Self {
            date,
            precision: DatePrecision::Month,
        })
    }

    /// Creates a day-precision date.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            date,
            precision: DatePrecision::Day,
        }
    }

    /// The first calendar day this date covers.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Whether the day was written.
    #[must_use]
    pub const fn precision(&self) -> DatePrecision {
        self.precision
    }

    /// Parses `YYYY-MM` or `YYYY-MM-DD`, returning `None` on anything else.
    #[must_use]
    pub fn parse_opt(s: &str) -> Option<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();
        let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);

        match bytes.len() {
            7 if digits(0..4) && bytes[4] == b'-' && digits(5..7) => {
                let year = s[0..4].parse().ok()?;
                let month = s[5..7].parse().ok()?;
                Self::month(year, month)
            }
            10 if digits(0..4)
                && bytes[4] == b'-'
                && digits(5..7)
                && bytes[7] == b'-'
                && digits(8..10) =>
            {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Self::day)
            }
            _ => None,
        }
    }
}

impl FromStr for FactDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_opt(s).ok_or_else(|| ValidationError::InvalidDate {
            value: s.to_string(),
        })
    }
}

impl From<NaiveDate> for FactDate {
    fn from(date: NaiveDate) -> Self {
        Self::day(date)
    }
}

impl TryFrom<String> for FactDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FactDate> for String {
    fn from(value: FactDate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for FactDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.precision {
            DatePrecision::Month => write!(f, "{:04}-{:02}", self.date.year(), self.date.month()),
            DatePrecision::Day => write!(f, "{}", self.date.format("%Y-%m-%d")),
        }
    }
}

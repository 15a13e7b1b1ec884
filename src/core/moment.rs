use crate::core::date_math::days_in_month;
use crate::core::format;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

fn valid_date(year: i32, month: u8, day: u8) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year) && month < 12 && day >= 1 && day <= days_in_month(year, month)
}

// ── CalendarDate ──────────────────────────────────────────────────────────────

/// A date without time of day. `month` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
}

impl CalendarDate {
    pub fn new(year: i32, month: u8, day: u8) -> Option<Self> {
        valid_date(year, month, day).then_some(Self { year, month, day })
    }

    /// Parses `YYYY-MM-DD` (1-based month, as written by humans).
    pub fn parse_iso(text: &str) -> Option<Self> {
        let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()?;
        Self::new(date.year(), date.month0() as u8, date.day() as u8)
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Combines this date with a time of day.
    pub fn at(self, hour: u8, minute: u8) -> Option<Moment> {
        Moment::new(self.year, self.month, self.day, hour, minute)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month + 1, self.day)
    }
}

// ── Moment ────────────────────────────────────────────────────────────────────

/// A point in time at minute precision.
///
/// Every `Moment` is complete and valid: the day always exists in its
/// `(year, month)` and the time fields are in range. There is no way to build
/// a partial one, including through deserialization. `month` is 0-based.
///
/// Field order makes the derived ordering chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "MomentParts", into = "MomentParts")]
pub struct Moment {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
}

impl Moment {
    pub const EPOCH: Moment = Moment {
        year: 1970,
        month: 0,
        day: 1,
        hour: 0,
        minute: 0,
    };

    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8) -> Option<Self> {
        if !valid_date(year, month, day) || hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// Truncates seconds and below. `None` outside the supported year range.
    pub fn from_naive(value: &NaiveDateTime) -> Option<Self> {
        Self::new(
            value.year(),
            value.month0() as u8,
            value.day() as u8,
            value.hour() as u8,
            value.minute() as u8,
        )
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u8 {
        self.month
    }

    pub fn day(self) -> u8 {
        self.day
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn date(self) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    /// Same time of day on another date.
    pub fn with_date(self, date: CalendarDate) -> Self {
        Self {
            year: date.year,
            month: date.month,
            day: date.day,
            ..self
        }
    }
}

impl fmt::Display for Moment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format::format_moment(*self))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct MomentParts {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
}

impl TryFrom<MomentParts> for Moment {
    type Error = String;

    fn try_from(parts: MomentParts) -> Result<Self, Self::Error> {
        Moment::new(parts.year, parts.month, parts.day, parts.hour, parts.minute).ok_or_else(
            || {
                format!(
                    "invalid moment {:04}-{:02}-{:02} {:02}:{:02} (month is 0-based)",
                    parts.year, parts.month, parts.day, parts.hour, parts.minute
                )
            },
        )
    }
}

impl From<Moment> for MomentParts {
    fn from(m: Moment) -> Self {
        Self {
            year: m.year,
            month: m.month,
            day: m.day,
            hour: m.hour,
            minute: m.minute,
        }
    }
}

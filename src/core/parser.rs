//! Free-form text to [`Moment`].
//!
//! Two stages, first match wins:
//!
//! 1. lenient: a set of common machine and human shapes (RFC 3339, ISO-like,
//!    slash dates, `March 5, 2025 14:30`), interpreted by chrono;
//! 2. pattern: the canonical 12-hour display form, normalized to 24 hours and
//!    fed back through stage 1.
//!
//! Impossible calendar dates fail both stages; nothing is normalized.

use crate::core::moment::Moment;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M",
    "%B %d, %Y %H:%M",
    "%b %d %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y"];

fn meridiem_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^([a-z]+)\s+(\d{1,2}),\s*(\d{4})\s+(\d{1,2}):(\d{2})\s*(am|pm)$")
            .expect("meridiem pattern is valid")
    })
}

pub struct TextMomentParser;

impl TextMomentParser {
    pub fn parse(text: &str) -> Option<Moment> {
        if let Some(moment) = Self::parse_lenient(text) {
            log::trace!("lenient stage matched {text:?}");
            return Some(moment);
        }
        let parsed = Self::parse_pattern(text);
        if parsed.is_some() {
            log::trace!("pattern stage matched {text:?}");
        } else {
            log::trace!("no stage matched {text:?}");
        }
        parsed
    }

    /// Stage 1.
    pub fn parse_lenient(text: &str) -> Option<Moment> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Moment::from_naive(&dt.naive_local());
        }
        for fmt in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
                return Moment::from_naive(&dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
                return Moment::from_naive(&date.and_hms_opt(0, 0, 0)?);
            }
        }
        None
    }

    /// Stage 2: `"<Month> <D|DD>, <YYYY> <H|HH>:<MM> <AM|PM>"`.
    pub fn parse_pattern(text: &str) -> Option<Moment> {
        let caps = meridiem_pattern().captures(text.trim())?;
        let hour: u8 = caps[4].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = caps[6].eq_ignore_ascii_case("pm");
        let hour = match (pm, hour) {
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, 12) => 0,
            (false, h) => h,
        };
        let normalized = format!(
            "{} {}, {} {:02}:{}",
            &caps[1], &caps[2], &caps[3], hour, &caps[5]
        );
        Self::parse_lenient(&normalized)
    }
}

//! Enkephalin status parsing and time-to-full estimation.
//!
//! The game shows enkephalin as `current/max`. One point regenerates every
//! [`MINUTES_PER_POINT`] minutes, so the time until the counter is full is a
//! pure function of the two numbers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Regeneration time of a single enkephalin point.
pub const MINUTES_PER_POINT: u64 = 6;

/// Display language for status and error strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("status text \"{0}\" has no '/' separator")]
    MissingSeparator(String),

    #[error("status text \"{0}\" has more than one '/' separator")]
    TooManyParts(String),

    #[error("\"{part}\" is not a non-negative integer: {source}")]
    InvalidNumber {
        part: String,
        #[source]
        source: ParseIntError,
    },
}

/// Parsed `current/max` pair.
///
/// `current > max` is accepted as-is and reported as already full.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceStatus {
    pub current: u64,
    pub max: u64,
}

impl FromStr for ResourceStatus {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.split('/');
        let current = parts.next().unwrap_or_default();
        let max = parts
            .next()
            .ok_or_else(|| ParseError::MissingSeparator(text.to_string()))?;
        if parts.next().is_some() {
            return Err(ParseError::TooManyParts(text.to_string()));
        }

        Ok(Self {
            current: parse_count(current)?,
            max: parse_count(max)?,
        })
    }
}

fn parse_count(part: &str) -> Result<u64, ParseError> {
    part.trim()
        .parse::<u64>()
        .map_err(|source| ParseError::InvalidNumber {
            part: part.to_string(),
            source,
        })
}

impl ResourceStatus {
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn remaining_minutes(&self) -> u64 {
        self.max
            .saturating_sub(self.current)
            .saturating_mul(MINUTES_PER_POINT)
    }

    pub fn time_to_full(&self) -> TimeToFull {
        if self.is_full() {
            return TimeToFull::AlreadyFull;
        }
        let minutes = self.remaining_minutes();
        TimeToFull::Remaining {
            hours: minutes / 60,
            minutes: minutes % 60,
        }
    }

    /// Wall-clock time at which the counter reaches `max`, counted from `now`.
    ///
    /// `None` when that time is past what `chrono` can represent.
    pub fn full_at(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        let minutes = i64::try_from(self.remaining_minutes()).ok()?;
        now.checked_add_signed(Duration::try_minutes(minutes)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeToFull {
    AlreadyFull,
    Remaining { hours: u64, minutes: u64 },
}

impl TimeToFull {
    pub fn localized(&self, locale: Locale) -> String {
        match (self, locale) {
            (Self::AlreadyFull, Locale::En) => "already full".to_string(),
            (Self::AlreadyFull, Locale::Zh) => "已回满".to_string(),
            (Self::Remaining { hours, minutes }, Locale::En) => {
                format!("{}h {}m", hours, minutes)
            }
            (Self::Remaining { hours, minutes }, Locale::Zh) => {
                format!("{}小时 {}分钟", hours, minutes)
            }
        }
    }
}

impl fmt::Display for TimeToFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.localized(Locale::En))
    }
}

/// Parses a `current/max` status string and renders the time until full.
#[cfg_attr(not(test), allow(dead_code))]
pub fn parse_time_to_full(text: &str) -> Result<String, ParseError> {
    let status: ResourceStatus = text.parse()?;
    Ok(status.time_to_full().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_partial_status() {
        assert_eq!(parse_time_to_full("16/123").unwrap(), "10h 42m");
        assert_eq!(parse_time_to_full("0/10").unwrap(), "1h 0m");
        assert_eq!(parse_time_to_full("122/123").unwrap(), "0h 6m");
    }

    #[test]
    fn test_already_full() {
        assert_eq!(parse_time_to_full("123/123").unwrap(), "already full");
        assert_eq!(parse_time_to_full("130/123").unwrap(), "already full");
        assert_eq!(parse_time_to_full("0/0").unwrap(), "already full");
    }

    #[test]
    fn test_formula_holds_for_all_small_values() {
        for max in 1..=200u64 {
            for current in 0..max {
                let remaining = (max - current) * 6;
                let expected = format!("{}h {}m", remaining / 60, remaining % 60);
                let text = format!("{}/{}", current, max);
                assert_eq!(parse_time_to_full(&text).unwrap(), expected, "{}", text);
            }
        }
    }

    #[test]
    fn test_full_for_all_small_values() {
        for max in 0..=50u64 {
            for current in max..=max + 20 {
                let text = format!("{}/{}", current, max);
                assert_eq!(parse_time_to_full(&text).unwrap(), "already full");
            }
        }
    }

    #[test]
    fn test_non_numeric_fails() {
        assert!(matches!(
            parse_time_to_full("abc/123"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_time_to_full("16/"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_time_to_full("-1/123"),
            Err(ParseError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_separator_errors() {
        assert_eq!(
            parse_time_to_full("16123"),
            Err(ParseError::MissingSeparator("16123".to_string()))
        );
        assert_eq!(
            parse_time_to_full("1/2/3"),
            Err(ParseError::TooManyParts("1/2/3".to_string()))
        );
    }

    #[test]
    fn test_whitespace_tolerated() {
        let status: ResourceStatus = " 16 / 123 ".parse().unwrap();
        assert_eq!(status, ResourceStatus { current: 16, max: 123 });
    }

    #[test]
    fn test_localized_rendering() {
        let status = ResourceStatus { current: 16, max: 123 };
        assert_eq!(status.time_to_full().localized(Locale::Zh), "10小时 42分钟");
        assert_eq!(TimeToFull::AlreadyFull.localized(Locale::Zh), "已回满");
    }

    #[test]
    fn test_full_at() {
        let now = Local.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        let status = ResourceStatus { current: 16, max: 123 };
        let full = status.full_at(now).unwrap();
        assert_eq!(full - now, Duration::minutes(642));

        let full_status = ResourceStatus { current: 200, max: 123 };
        assert_eq!(full_status.full_at(now), Some(now));

        let huge = ResourceStatus { current: 0, max: u64::MAX };
        assert_eq!(huge.full_at(now), None);
    }

    #[test]
    fn test_counts_beyond_u32() {
        let status: ResourceStatus = "16/5000000000".parse().unwrap();
        assert_eq!(status.max, 5_000_000_000);
        assert_eq!(status.remaining_minutes(), (5_000_000_000 - 16) * 6);

        let saturated = ResourceStatus { current: 0, max: u64::MAX };
        assert_eq!(saturated.remaining_minutes(), u64::MAX);
    }
}

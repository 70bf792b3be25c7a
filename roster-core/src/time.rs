//! Time-of-day values and ranges as used by shifts and slot text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};

pub const MINUTES_PER_HOUR: u16 = 60;

/// Minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const fn hhmm(hours: u16, minutes: u16) -> Self {
        TimeOfDay(hours * MINUTES_PER_HOUR + minutes)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hours(self) -> u16 {
        self.0 / MINUTES_PER_HOUR
    }

    pub fn minute(self) -> u16 {
        self.0 % MINUTES_PER_HOUR
    }

    /// Parse `H`, `HH`, `H:MM` or `HH:MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (h, m) = match s.split_once(':') {
            Some((h, m)) => (h, m),
            None => (s, "00"),
        };
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return None;
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: u16 = h.parse().ok()?;
        let minutes: u16 = m.parse().ok()?;
        if minutes >= MINUTES_PER_HOUR || hours > 24 || (hours == 24 && minutes > 0) {
            return None;
        }
        Some(TimeOfDay::hhmm(hours, minutes))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeOfDay::parse(s).ok_or_else(|| RosterError::TimeRange(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// A start/stop pair on the same day. `stop` is always after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub stop: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, stop: TimeOfDay) -> RosterResult<Self> {
        if stop <= start {
            return Err(RosterError::TimeRange(format!("{start}-{stop}")));
        }
        Ok(TimeRange { start, stop })
    }

    /// Parse `H[H][:MM]<sep>H[H][:MM]`, whitespace around the separator is allowed.
    pub fn parse_with(s: &str, separator: char) -> RosterResult<Self> {
        let (start, stop) = s
            .split_once(separator)
            .ok_or_else(|| RosterError::TimeRange(s.to_string()))?;
        let start = TimeOfDay::parse(start).ok_or_else(|| RosterError::TimeRange(s.to_string()))?;
        let stop = TimeOfDay::parse(stop).ok_or_else(|| RosterError::TimeRange(s.to_string()))?;
        TimeRange::new(start, stop)
    }

    pub fn duration_minutes(&self) -> u16 {
        self.stop.minutes() - self.start.minutes()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.stop)
    }
}

impl FromStr for TimeRange {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::parse_with(s, '-')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hour_only_and_hour_minute() {
        assert_eq!(TimeOfDay::parse("9"), Some(TimeOfDay::hhmm(9, 0)));
        assert_eq!(TimeOfDay::parse("13:00"), Some(TimeOfDay::hhmm(13, 0)));
        assert_eq!(TimeOfDay::parse("9:45").map(|t| t.minutes()), Some(585));
        assert_eq!(TimeOfDay::parse("9:5"), None);
        assert_eq!(TimeOfDay::parse("x"), None);
        assert_eq!(TimeOfDay::parse("25"), None);
    }

    #[test]
    fn test_range_duration() {
        let range: TimeRange = "13:00-19:00".parse().unwrap();
        assert_eq!(range.start.minutes(), 780);
        assert_eq!(range.stop.minutes(), 1140);
        assert_eq!(range.duration_minutes(), 360);

        let range: TimeRange = "8-12:30".parse().unwrap();
        assert_eq!(range.duration_minutes(), 270);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!("19:00-13:00".parse::<TimeRange>().is_err());
        assert!("13:00".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeOfDay::hhmm(9, 5).to_string(), "09:05");
        let range = TimeRange::new(TimeOfDay::hhmm(9, 45), TimeOfDay::hhmm(14, 0)).unwrap();
        assert_eq!(range.to_string(), "09:45-14:00");
    }
}

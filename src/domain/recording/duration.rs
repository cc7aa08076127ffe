//! Duration value object for timed recordings

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default length of a timed recording (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// Length of a timed recording.
/// Always non-zero; validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default timed recording length
    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Milliseconds left after `elapsed_ms` have passed (zero once exceeded)
    pub const fn remaining_after(&self, elapsed_ms: u64) -> u64 {
        self.milliseconds.saturating_sub(elapsed_ms)
    }

    /// Whether `elapsed_ms` has reached this duration
    pub const fn is_reached(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.milliseconds
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse "30s", "1m", "2m30s" or "90s".
    /// Units must appear at most once and minutes before seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        let (minutes_part, seconds_part) = match input.split_once('m') {
            Some((minutes, rest)) => (Some(minutes), rest),
            None => (None, input.as_str()),
        };

        let minutes = match minutes_part {
            Some(digits) => parse_digits(digits).ok_or_else(invalid)?,
            None => 0,
        };

        let seconds = if seconds_part.is_empty() {
            if minutes_part.is_none() {
                return Err(invalid());
            }
            0
        } else {
            let digits = seconds_part.strip_suffix('s').ok_or_else(invalid)?;
            parse_digits(digits).ok_or_else(invalid)?
        };

        let total_ms = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .and_then(|secs| secs.checked_mul(1000))
            .ok_or_else(invalid)?;

        if total_ms == 0 {
            return Err(invalid());
        }

        Ok(Self {
            milliseconds: total_ms,
        })
    }
}

/// Parse a non-empty run of ASCII digits
fn parse_digits(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        match (minutes, seconds) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}

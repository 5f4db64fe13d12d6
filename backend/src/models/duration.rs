//! Ride durations (rolling time, total time).
//!
//! A duration arrives either as a clock-time string `H:M:S` or, from the
//! decomposed day/hour/minute/second controls, as [`DurationParts`]. Both end
//! up as one [`RideDuration`] measured in seconds.

use std::fmt;
use std::str::FromStr;

use qtty::time::{Day, Days, Hour, Hours, Minutes, Second, Seconds};
use serde::{Deserialize, Serialize};

use super::error::{parse_non_negative, ParseError, ParseResult};

/// Non-negative elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RideDuration(Seconds);

impl RideDuration {
    /// Zero-length duration.
    pub const ZERO: RideDuration = RideDuration(Seconds::new(0.0));

    /// Build from a number of seconds. Negative or non-finite values are rejected.
    pub fn from_secs(seconds: f64) -> Option<Self> {
        if seconds.is_finite() && seconds >= 0.0 {
            Some(Self(Seconds::new(seconds)))
        } else {
            None
        }
    }

    /// Parse a colon-separated `H:M:S` clock-time string.
    ///
    /// Exactly three segments are required and every segment must be a
    /// non-negative number. `"1:02:03"` is 3723 seconds.
    pub fn parse_hms(raw: &str) -> ParseResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        let segments: Vec<&str> = trimmed.split(':').collect();
        if segments.len() != 3 {
            return Err(ParseError::SegmentCount {
                found: segments.len(),
            });
        }

        let hours = parse_non_negative(segments[0])?;
        let minutes = parse_non_negative(segments[1])?;
        let seconds = parse_non_negative(segments[2])?;

        Ok(Self(Seconds::new(hours * 3600.0 + minutes * 60.0 + seconds)))
    }

    /// Combine the decomposed day/hour/minute/second controls.
    ///
    /// Blank parts count as zero; a fully blank set is [`ParseError::Empty`].
    pub fn from_parts(parts: &DurationParts) -> ParseResult<Self> {
        if parts.is_blank() {
            return Err(ParseError::Empty);
        }

        let part = |raw: &str| -> ParseResult<f64> {
            if raw.trim().is_empty() {
                Ok(0.0)
            } else {
                parse_non_negative(raw)
            }
        };

        let total = Days::new(part(&parts.days)?).to::<Second>()
            + Hours::new(part(&parts.hours)?).to::<Second>()
            + Minutes::new(part(&parts.minutes)?).to::<Second>()
            + Seconds::new(part(&parts.seconds)?);

        Ok(Self(total))
    }

    /// Total seconds as a raw `f64`.
    pub fn seconds(&self) -> f64 {
        self.0.value()
    }

    pub fn as_hours(&self) -> Hours {
        self.0.to::<Hour>()
    }

    pub fn as_days(&self) -> Days {
        self.0.to::<Day>()
    }

    /// Render as zero-padded `HH:MM:SS` (see [`format_hms`]).
    pub fn to_hms(&self) -> String {
        format_hms(self.seconds())
    }
}

impl FromStr for RideDuration {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hms(s)
    }
}

impl fmt::Display for RideDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hms())
    }
}

/// Raw text of the decomposed duration controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationParts {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl DurationParts {
    pub fn new(
        days: impl Into<String>,
        hours: impl Into<String>,
        minutes: impl Into<String>,
        seconds: impl Into<String>,
    ) -> Self {
        Self {
            days: days.into(),
            hours: hours.into(),
            minutes: minutes.into(),
            seconds: seconds.into(),
        }
    }

    fn is_blank(&self) -> bool {
        [&self.days, &self.hours, &self.minutes, &self.seconds]
            .iter()
            .all(|p| p.trim().is_empty())
    }
}

/// Format a number of seconds as zero-padded `HH:MM:SS`.
///
/// Minutes are the whole-minute remainder after hours. Seconds are a plain
/// `% 60`, so fractional input keeps its fraction: `3723.5` renders as
/// `"01:02:03.5"`.
pub fn format_hms(total_seconds: f64) -> String {
    let total = total_seconds.max(0.0);
    let hours = (total / 3600.0).floor();
    let minutes = ((total - hours * 3600.0) / 60.0).floor();
    let seconds = total % 60.0;

    let seconds = if seconds < 10.0 {
        format!("0{}", seconds)
    } else {
        seconds.to_string()
    };

    format!("{:02}:{:02}:{}", hours as u64, minutes as u64, seconds)
}

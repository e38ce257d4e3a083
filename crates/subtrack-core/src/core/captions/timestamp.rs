//! Timestamp Parsing
//!
//! Upstream timing data is not fully trusted, so conversion is best-effort:
//! anything unrecognized resolves to `0` instead of failing.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::TimeMs;

static SRT_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})$").expect("static timestamp pattern")
});

/// A timestamp as delivered by a matching service: plain seconds or SRT text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Seconds (fractional allowed)
    Seconds(f64),
    /// `HH:MM:SS,mmm`
    Text(String),
}

impl RawTimestamp {
    /// Converts to milliseconds, `0` when unrecognized.
    pub fn to_millis(&self) -> TimeMs {
        match self {
            Self::Seconds(seconds) => seconds_to_millis(*seconds),
            Self::Text(text) => parse_srt_timestamp(text).unwrap_or_else(|| {
                debug!("Timestamp format not recognized: {:?}", text);
                0
            }),
        }
    }
}

impl From<f64> for RawTimestamp {
    fn from(seconds: f64) -> Self {
        Self::Seconds(seconds)
    }
}

impl From<&str> for RawTimestamp {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Parses an optional raw timestamp into milliseconds.
///
/// Missing values resolve to `0`, as do strings that do not match the
/// strict `HH:MM:SS,mmm` pattern and non-finite numbers.
pub fn parse_timestamp(value: Option<&RawTimestamp>) -> TimeMs {
    value.map(RawTimestamp::to_millis).unwrap_or(0)
}

/// Parses a strict `HH:MM:SS,mmm` timestamp (surrounding whitespace allowed).
pub fn parse_srt_timestamp(text: &str) -> Option<TimeMs> {
    let caps = SRT_TIMESTAMP.captures(text.trim())?;
    let field = |i: usize| caps[i].parse::<TimeMs>().ok();
    Some(compose_millis(field(1)?, field(2)?, field(3)?, field(4)?))
}

pub(crate) fn compose_millis(hours: TimeMs, minutes: TimeMs, seconds: TimeMs, millis: TimeMs) -> TimeMs {
    ((hours * 3600) + (minutes * 60) + seconds) * 1000 + millis
}

fn seconds_to_millis(seconds: f64) -> TimeMs {
    if !seconds.is_finite() {
        debug!("Non-finite timestamp {}, using 0", seconds);
        return 0;
    }
    // Rounding absorbs float noise such as 1.001 * 1000 = 1000.9999.
    (seconds * 1000.0).round() as TimeMs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_are_scaled() {
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Seconds(2.0))), 2000);
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Seconds(1.5))), 1500);
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Seconds(0.0))), 0);
        assert_eq!(parse_timestamp(Some(&RawTimestamp::Seconds(1.001))), 1001);
    }

    #[test]
    fn test_srt_text_is_composed() {
        let ts = RawTimestamp::from("01:02:03,456");
        assert_eq!(ts.to_millis(), ((3600 + 2 * 60 + 3) * 1000) + 456);
    }

    #[test]
    fn test_missing_and_garbage_resolve_to_zero() {
        assert_eq!(parse_timestamp(None), 0);
        assert_eq!(RawTimestamp::from("soon").to_millis(), 0);
        assert_eq!(RawTimestamp::from("1:02:03,456").to_millis(), 0);
        assert_eq!(RawTimestamp::from("01:02:03.456").to_millis(), 0);
        assert_eq!(RawTimestamp::Seconds(f64::NAN).to_millis(), 0);
        assert_eq!(RawTimestamp::Seconds(f64::INFINITY).to_millis(), 0);
    }

    #[test]
    fn test_strict_pattern_rejects_trailing_text() {
        assert_eq!(parse_srt_timestamp("00:00:01,000 --> 00:00:02,000"), None);
        assert_eq!(parse_srt_timestamp(" 00:00:01,000 "), Some(1000));
    }

    #[test]
    fn test_deserialize_number_string_and_null() {
        #[derive(Deserialize)]
        struct Record {
            #[serde(default)]
            start: Option<RawTimestamp>,
        }

        let number: Record = serde_json::from_str(r#"{"start": 3}"#).unwrap();
        assert_eq!(parse_timestamp(number.start.as_ref()), 3000);

        let text: Record = serde_json::from_str(r#"{"start": "00:00:04,250"}"#).unwrap();
        assert_eq!(parse_timestamp(text.start.as_ref()), 4250);

        let null: Record = serde_json::from_str(r#"{"start": null}"#).unwrap();
        assert_eq!(parse_timestamp(null.start.as_ref()), 0);
    }
}

//! The latency log line format.
//!
//! ```text
//! [YYYY-MM-DD HH:MM:SS] Response latency: <integer>ms
//! ```

use std::str::FromStr;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::AgentError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LINE_MARKER: &str = "] Response latency: ";

/// One response latency measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRecord {
    /// Local wall-clock time, second precision.
    pub recorded_at: NaiveDateTime,
    /// Interval length in whole milliseconds.
    pub duration_ms: u64,
}

impl LatencyRecord {
    pub fn new(recorded_at: NaiveDateTime, duration_ms: u64) -> Self {
        Self {
            recorded_at: recorded_at.with_nanosecond(0).unwrap_or(recorded_at),
            duration_ms,
        }
    }

    /// Record `duration` stamped with the current local time.
    pub fn now(duration: Duration) -> Self {
        Self::new(Local::now().naive_local(), round_millis(duration))
    }
}

/// Round a duration to the nearest whole millisecond.
pub fn round_millis(duration: Duration) -> u64 {
    // Float-to-int `as` saturates, so huge durations clamp to u64::MAX.
    (duration.as_secs_f64() * 1000.0).round() as u64
}

impl std::fmt::Display for LatencyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] Response latency: {}ms",
            self.recorded_at.format(TIMESTAMP_FORMAT),
            self.duration_ms
        )
    }
}

impl FromStr for LatencyRecord {
    type Err = AgentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || AgentError::Config(format!("malformed latency line: {line:?}"));

        let rest = line.trim().strip_prefix('[').ok_or_else(invalid)?;
        let (stamp, tail) = rest.split_once(LINE_MARKER).ok_or_else(invalid)?;
        let millis = tail.strip_suffix("ms").ok_or_else(invalid)?;

        let recorded_at =
            NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
        let duration_ms = millis.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self::new(recorded_at, duration_ms))
    }
}

//! Reading the latency log back and summarizing it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::record::LatencyRecord;
use crate::error::{AgentError, Result};

/// Summary statistics over a set of latency records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySummary {
    pub samples: usize,
    pub min_ms: u64,
    pub mean_ms: u64,
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
    pub max_ms: u64,
}

impl LatencySummary {
    /// Summarize `records`; `None` when there are no samples.
    pub fn from_records(records: &[LatencyRecord]) -> Option<Self> {
        let mut sorted: Vec<u64> = records.iter().map(|r| r.duration_ms).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_unstable();

        let total: u128 = sorted.iter().map(|&ms| u128::from(ms)).sum();
        let mean = total / sorted.len() as u128;

        Some(Self {
            samples: sorted.len(),
            min_ms: sorted[0],
            mean_ms: u64::try_from(mean).unwrap_or(u64::MAX),
            p50_ms: percentile(&sorted, 50),
            p95_ms: percentile(&sorted, 95),
            p99_ms: percentile(&sorted, 99),
            max_ms: sorted[sorted.len() - 1],
        })
    }
}

fn percentile(sorted: &[u64], pct: usize) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = (sorted.len().saturating_sub(1) * pct) / 100;
    sorted[idx]
}

/// Parse every well-formed line of a latency log, in file order.
///
/// Malformed lines are skipped with a warning.
pub fn read_log(path: &Path) -> Result<Vec<LatencyRecord>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AgentError::Config(format!("failed to read latency log {}: {e}", path.display()))
    })?;
    Ok(parse_log(&raw))
}

fn parse_log(raw: &str) -> Vec<LatencyRecord> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match line.parse::<LatencyRecord>() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "skipping latency log line");
                None
            }
        })
        .collect()
}

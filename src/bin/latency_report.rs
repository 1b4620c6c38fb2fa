//! Summarize a response latency log as JSON.
//!
//! Usage: `smartq-latency-report [LOG_PATH]`. Without an argument the path
//! comes from `SMARTQ_LATENCY_LOG`, then the default `latency.txt`.

use std::path::PathBuf;

use smartq_voice::config::{ENV_LATENCY_LOG, LatencyConfig};
use smartq_voice::latency::{LatencySummary, read_log};

fn main() {
    if let Err(e) = run() {
        eprintln!("smartq-latency-report failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> smartq_voice::Result<()> {
    let log_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(ENV_LATENCY_LOG).map(PathBuf::from))
        .unwrap_or_else(|| LatencyConfig::default().log_path);

    let records = read_log(&log_path)?;
    let Some(summary) = LatencySummary::from_records(&records) else {
        println!("no latency samples in {}", log_path.display());
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&summary).map_err(|e| {
        smartq_voice::AgentError::Config(format!("failed to encode latency summary: {e}"))
    })?;
    println!("{json}");
    Ok(())
}

//! Append-only latency recorder shared by every session in the process.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use tracing::{info, warn};

use super::record::LatencyRecord;
use crate::config::LatencyConfig;

/// Formats measurements and appends them to the latency log.
///
/// Writes are fire-and-forget: a failed append is reported with `warn!` and
/// never reaches the session. Each line is written with a single
/// `write_all` on an append-mode handle while holding `write_lock`, so
/// concurrent sessions cannot interleave within a line.
#[derive(Debug)]
pub struct LatencyRecorder {
    log_path: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl LatencyRecorder {
    /// Recorder appending to `log_path`.
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: Some(log_path.into()),
            write_lock: Mutex::new(()),
        }
    }

    /// Recorder that only emits to the tracing stream.
    pub fn stream_only() -> Self {
        Self {
            log_path: None,
            write_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &LatencyConfig) -> Self {
        if config.enabled {
            Self::new(config.log_path.clone())
        } else {
            Self::stream_only()
        }
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Record one measurement and return the written record.
    pub fn record(&self, duration: Duration) -> LatencyRecord {
        let record = LatencyRecord::now(duration);
        let line = record.to_string();
        info!(target: "smartq_voice::latency", duration_ms = record.duration_ms, "{line}");

        if let Some(path) = &self.log_path
            && let Err(e) = self.append_line(path, &line)
        {
            warn!(
                path = %path.display(),
                error = %e,
                "failed to append latency record; continuing"
            );
        }
        record
    }

    fn append_line(&self, path: &Path, line: &str) -> std::io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        // A poisoned lock only means another writer panicked mid-append; the
        // file itself is still usable.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Blocking I/O on the tracker task; one short line per turn.
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(buf.as_bytes())?;
        file.flush()
    }
}

//! Response latency instrumentation.
//!
//! A latency interval runs from the dialogue engine entering `thinking` to
//! speech output starting. Each measurement becomes one [`LatencyRecord`]
//! line, emitted to the tracing stream and appended to an append-only log.

pub mod record;
pub mod recorder;
pub mod summary;

pub use record::LatencyRecord;
pub use recorder::LatencyRecorder;
pub use summary::{LatencySummary, read_log};

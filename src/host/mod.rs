//! Host-facing transport for an external speech pipeline process.

pub mod contract;
pub mod stdio;

pub use contract::{HostEvent, PipelineMessage};
pub use stdio::{JsonLinePipeline, StdioPipeline, run_stdio_agent};

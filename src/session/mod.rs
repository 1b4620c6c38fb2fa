//! Per-connection session state and turn tracking.

pub mod state;
pub mod tracker;

pub use state::Session;
pub use tracker::{SessionStateTracker, SessionStats};

//! Speech pipeline vocabulary and engine seam.

pub mod engine;
pub mod messages;

pub use engine::VoicePipeline;
pub use messages::{ToolInvocation, TurnState, TurnStateChanged};

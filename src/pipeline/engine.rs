//! The seam between the orchestrator and the external speech stack.
//!
//! Speech recognition, the dialogue engine and speech synthesis live outside
//! this crate. They are reached only through [`VoicePipeline`]: a stream of
//! turn-state changes, a stream of tool invocations, and two commands.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::messages::{ToolInvocation, TurnStateChanged};
use crate::error::Result;

/// A live speech session driven by an external speech/dialogue stack.
///
/// Both subscriptions must be taken before [`start`](Self::start) so that no
/// event emitted at startup is missed. Each may be taken once.
#[async_trait]
pub trait VoicePipeline: Send {
    /// Stream of turn-state changes, in emission order.
    fn subscribe_turn_states(&mut self) -> Result<mpsc::UnboundedReceiver<TurnStateChanged>>;

    /// Stream of tool calls issued by the dialogue engine.
    fn subscribe_tool_calls(&mut self) -> Result<mpsc::UnboundedReceiver<ToolInvocation>>;

    /// Start the session with persona instructions and tool schemas.
    async fn start(&mut self, instructions: &str, tools: Vec<serde_json::Value>) -> Result<()>;

    /// Ask the dialogue engine for one reply guided by `instructions`.
    async fn generate_reply(&mut self, instructions: &str) -> Result<()>;
}

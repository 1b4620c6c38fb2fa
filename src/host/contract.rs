//! Newline-delimited JSON contract between the orchestrator and an external
//! speech pipeline process.

use serde::{Deserialize, Serialize};

use crate::pipeline::TurnState;

/// Messages the speech pipeline sends to the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineMessage {
    /// The agent's turn state changed.
    AgentStateChanged {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        old_state: Option<TurnState>,
        new_state: TurnState,
    },
    /// The dialogue engine wants a tool executed.
    ToolCall {
        call_id: String,
        name: String,
        #[serde(default = "empty_arguments")]
        arguments: serde_json::Value,
    },
    /// The connection is over.
    SessionEnd,
}

fn empty_arguments() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Messages the orchestrator sends to the speech pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Configure and start the session.
    SessionStarted {
        instructions: String,
        tools: Vec<serde_json::Value>,
    },
    /// Produce one reply guided by `instructions`.
    GenerateReply { instructions: String },
    /// Result text for a prior tool call.
    ToolResult {
        call_id: String,
        name: String,
        output: String,
    },
    /// An inbound line could not be understood.
    ProtocolError { message: String },
}

//! Message types passed from the speech pipeline to the orchestrator.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// The speech pipeline's classification of the current conversational phase.
///
/// The vocabulary is owned by the speech pipeline; names this crate does not
/// know are preserved in [`TurnState::Other`] and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TurnState {
    Idle,
    Listening,
    Thinking,
    Speaking,
    Other(String),
}

impl TurnState {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => Self::Idle,
            "listening" => Self::Listening,
            "thinking" => Self::Thinking,
            "speaking" => Self::Speaking,
            _ => Self::Other(raw.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for TurnState {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TurnState> for String {
    fn from(state: TurnState) -> Self {
        state.as_str().to_owned()
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A turn-state change emitted by the speech pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnStateChanged {
    /// Previous state, when the pipeline reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_state: Option<TurnState>,
    pub new_state: TurnState,
}

impl TurnStateChanged {
    pub fn to(new_state: TurnState) -> Self {
        Self {
            old_state: None,
            new_state,
        }
    }
}

/// A tool call requested by the dialogue engine.
///
/// The orchestrator answers on `reply`. If the receiver has been dropped the
/// engine has gone away and the result is discarded.
#[derive(Debug)]
pub struct ToolInvocation {
    /// Engine-assigned call identifier.
    pub call_id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    pub reply: oneshot::Sender<String>,
}

impl ToolInvocation {
    /// Build an invocation and the receiver its result will arrive on.
    pub fn new(
        call_id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> (Self, oneshot::Receiver<String>) {
        let (reply, rx) = oneshot::channel();
        (
            Self {
                call_id: call_id.into(),
                name: name.into(),
                arguments,
                reply,
            },
            rx,
        )
    }
}

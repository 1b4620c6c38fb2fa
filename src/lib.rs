//! SmartQ voice: session orchestrator for the SmartQ queue-management
//! voice assistant.
//!
//! The crate sits between an external speech stack and the SmartQ backend:
//! Speech pipeline → turn states / tool calls → orchestrator → backend
//!
//! # Architecture
//!
//! - **Backend query client**: posts `{action, params}` to the backend's
//!   agent-query endpoint with the shared agent secret
//! - **Tool dispatcher**: exposes four queue tools to the dialogue engine
//!   and turns every outcome into JSON text
//! - **Latency recorder**: measures thinking→speaking intervals and appends
//!   them to an append-only log
//! - **Session state tracker**: consumes turn-state changes for one session
//! - **Conversation bootstrap**: wires a session onto a [`pipeline::VoicePipeline`]

pub mod backend;
pub mod config;
pub mod conversation;
pub mod error;
pub mod host;
pub mod latency;
pub mod personality;
pub mod pipeline;
pub mod session;
pub mod tools;

pub use backend::{BackendClient, BackendQuery};
pub use config::AgentConfig;
pub use conversation::{ConversationBootstrap, LiveConversation};
pub use error::{AgentError, Result};
pub use latency::{LatencyRecord, LatencyRecorder};
pub use personality::Persona;
pub use session::{Session, SessionStats};
pub use tools::{ToolDispatcher, ToolResult};

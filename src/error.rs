//! Error types for the SmartQ voice orchestrator.

/// Top-level error type for the session orchestration layer.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Backend query service error (transport, status, or decode).
    #[error("backend error: {0}")]
    Backend(String),

    /// Tool argument validation error.
    #[error("tool error: {0}")]
    Tool(String),

    /// Session lifecycle or ordering error.
    #[error("session error: {0}")]
    Session(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AgentError>;

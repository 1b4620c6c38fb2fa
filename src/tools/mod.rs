//! Tool dispatch bridge between the dialogue engine and the backend.
//!
//! The dialogue engine sees four named tools. Arguments are normalized by
//! each [`QueueTool`], routed through the [`ToolDispatcher`], and the backend
//! reply (or failure) is handed back as JSON text.

pub mod dispatcher;
pub mod queue;
pub mod registry;
pub mod types;

pub use dispatcher::ToolDispatcher;
pub use registry::ToolRegistry;
pub use types::{QueueTool, ToolAction, ToolParams, ToolRequest, ToolResult};

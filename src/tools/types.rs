//! Core tool types shared by the registry, dispatcher and backend client.
//!
//! Defines the fixed [`ToolAction`] set, the outgoing [`ToolRequest`], the
//! [`ToolResult`] returned by the backend, and the [`QueueTool`] trait that
//! every registered tool implements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Parameter mapping sent to the backend.
///
/// Key presence means "filter requested", so optional parameters that are
/// empty are never inserted.
pub type ToolParams = BTreeMap<String, String>;

/// The fixed set of backend actions the dialogue engine may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolAction {
    GetRoomQueue,
    GetRoomDetails,
    GetShopDetails,
    BrowseRooms,
}

impl ToolAction {
    /// All actions, in registration order.
    pub const ALL: [ToolAction; 4] = [
        Self::GetRoomQueue,
        Self::GetRoomDetails,
        Self::GetShopDetails,
        Self::BrowseRooms,
    ];

    /// Render the action to its wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetRoomQueue => "get_room_queue",
            Self::GetRoomDetails => "get_room_details",
            Self::GetShopDetails => "get_shop_details",
            Self::BrowseRooms => "browse_rooms",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "get_room_queue" => Some(Self::GetRoomQueue),
            "get_room_details" => Some(Self::GetRoomDetails),
            "get_shop_details" => Some(Self::GetShopDetails),
            "browse_rooms" => Some(Self::BrowseRooms),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single backend query: action name plus normalized parameters.
///
/// Serializes to the backend's request body, `{"action": .., "params": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRequest {
    pub action: ToolAction,
    pub params: ToolParams,
}

impl ToolRequest {
    pub fn new(action: ToolAction, params: ToolParams) -> Self {
        Self { action, params }
    }
}

/// Insert a required, trimmed, non-empty value under `key`.
///
/// `arg_name` is the name the dialogue engine used, for the error message.
pub(crate) fn insert_required(
    params: &mut ToolParams,
    key: &str,
    arg_name: &str,
    value: Option<&str>,
) -> Result<()> {
    let value = value
        .ok_or_else(|| AgentError::Tool(format!("missing required argument: {arg_name}")))?
        .trim();
    if value.is_empty() {
        return Err(AgentError::Tool(format!("{arg_name} must not be empty")));
    }
    params.insert(key.to_owned(), value.to_owned());
    Ok(())
}

/// Insert an optional value under `key` only if it is non-blank.
pub(crate) fn insert_optional(params: &mut ToolParams, key: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        params.insert(key.to_owned(), value.to_owned());
    }
}

/// Outcome of a backend query.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    /// Decoded backend body, passed through without reshaping.
    Payload(serde_json::Value),
    /// Failure description surfaced to the dialogue engine.
    Error(String),
}

impl ToolResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// JSON value handed to the dialogue engine.
    ///
    /// Errors become `{"error": "<message>"}`.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Payload(value) => value.clone(),
            Self::Error(message) => serde_json::json!({ "error": message }),
        }
    }

    /// Text form handed to the dialogue engine.
    pub fn to_text(&self) -> String {
        self.to_value().to_string()
    }
}

/// A tool the dialogue engine can call.
///
/// Each tool owns its metadata (name, description, parameter schema) and the
/// normalization that turns engine-supplied arguments into backend params.
pub trait QueueTool: Send + Sync {
    /// The backend action this tool maps to.
    fn action(&self) -> ToolAction;

    /// Human-readable description for the dialogue engine.
    fn description(&self) -> &str;

    /// JSON schema of the tool's arguments.
    fn schema(&self) -> serde_json::Value;

    /// Normalize engine arguments into backend parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Tool`] when a required argument is missing or
    /// blank.
    fn build_params(&self, args: &serde_json::Value) -> Result<ToolParams>;

    /// Tool name, which is the action's wire name.
    fn name(&self) -> &'static str {
        self.action().as_str()
    }

    /// Build the full request for `args`.
    fn build_request(&self, args: &serde_json::Value) -> Result<ToolRequest> {
        Ok(ToolRequest::new(self.action(), self.build_params(args)?))
    }
}

//! The four SmartQ lookup tools.
//!
//! Each tool maps the dialogue engine's snake_case argument names onto the
//! backend's parameter names and enforces the required/optional contract.

use serde_json::Value;

use super::types::{QueueTool, ToolAction, ToolParams, insert_optional, insert_required};
use crate::error::Result;

fn str_arg<'a>(args: &'a Value, name: &str) -> Option<&'a str> {
    args.get(name).and_then(Value::as_str)
}

/// Current queue occupancy and estimated wait for one room.
///
/// # Arguments (JSON)
///
/// - `room_code` (string, required), e.g. `RM-ABC123`
pub struct RoomQueueTool;

impl QueueTool for RoomQueueTool {
    fn action(&self) -> ToolAction {
        ToolAction::GetRoomQueue
    }

    fn description(&self) -> &str {
        "Get the current queue status for a specific room: how many people are waiting \
         and the estimated wait time."
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "room_code": {
                    "type": "string",
                    "description": "The room code to look up, for example RM-ABC123"
                }
            },
            "required": ["room_code"]
        })
    }

    fn build_params(&self, args: &Value) -> Result<ToolParams> {
        let mut params = ToolParams::new();
        insert_required(&mut params, "roomCode", "room_code", str_arg(args, "room_code"))?;
        Ok(params)
    }
}

/// Static room metadata and the shop it belongs to.
///
/// # Arguments (JSON)
///
/// - `room_code` (string, required)
pub struct RoomDetailsTool;

impl QueueTool for RoomDetailsTool {
    fn action(&self) -> ToolAction {
        ToolAction::GetRoomDetails
    }

    fn description(&self) -> &str {
        "Get details about a specific room: name, type, capacity, operating hours, \
         and the shop it belongs to."
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "room_code": {
                    "type": "string",
                    "description": "The room code, for example RM-ABC123"
                }
            },
            "required": ["room_code"]
        })
    }

    fn build_params(&self, args: &Value) -> Result<ToolParams> {
        let mut params = ToolParams::new();
        insert_required(&mut params, "roomCode", "room_code", str_arg(args, "room_code"))?;
        Ok(params)
    }
}

/// Shop metadata and its rooms.
///
/// # Arguments (JSON)
///
/// - `identifier` (string, required): shop code or custom id
pub struct ShopDetailsTool;

impl QueueTool for ShopDetailsTool {
    fn action(&self) -> ToolAction {
        ToolAction::GetShopDetails
    }

    fn description(&self) -> &str {
        "Get details about a specific shop: name, address, category, contact info, \
         and its rooms."
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "identifier": {
                    "type": "string",
                    "description": "The shop code (e.g. SHOP-ABC123) or custom ID"
                }
            },
            "required": ["identifier"]
        })
    }

    fn build_params(&self, args: &Value) -> Result<ToolParams> {
        let mut params = ToolParams::new();
        insert_required(
            &mut params,
            "identifier",
            "identifier",
            str_arg(args, "identifier"),
        )?;
        Ok(params)
    }
}

/// Browse and search rooms.
///
/// # Arguments (JSON)
///
/// - `search` (string, optional): matched against room and shop names
/// - `category` (string, optional): shop category filter
pub struct BrowseRoomsTool;

impl QueueTool for BrowseRoomsTool {
    fn action(&self) -> ToolAction {
        ToolAction::BrowseRooms
    }

    fn description(&self) -> &str {
        "Browse and search available rooms and queues. Use when the user wants to find \
         a room or queue to join."
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "search": {
                    "type": "string",
                    "description": "Optional search term to filter rooms by name or description"
                },
                "category": {
                    "type": "string",
                    "description": "Optional shop category to filter by, e.g. Restaurant, Healthcare, Retail"
                }
            }
        })
    }

    fn build_params(&self, args: &Value) -> Result<ToolParams> {
        let mut params = ToolParams::new();
        insert_optional(&mut params, "search", str_arg(args, "search"));
        insert_optional(&mut params, "category", str_arg(args, "category"));
        Ok(params)
    }
}

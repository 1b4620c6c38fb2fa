//! Tool registry.
//!
//! The [`ToolRegistry`] holds registered tools, provides lookup by name, and
//! exports JSON schemas for the dialogue engine. It is built once at
//! bootstrap and shared read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use super::queue::{BrowseRoomsTool, RoomDetailsTool, RoomQueueTool, ShopDetailsTool};
use super::types::QueueTool;

/// Registry of tools keyed by action name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn QueueTool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the four SmartQ lookup tools.
    pub fn smartq() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RoomQueueTool));
        registry.register(Arc::new(RoomDetailsTool));
        registry.register(Arc::new(ShopDetailsTool));
        registry.register(Arc::new(BrowseRoomsTool));
        registry
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn QueueTool>) {
        self.tools.insert(tool.name(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn QueueTool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.tools.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Export JSON schemas for all tools, sorted by name.
    ///
    /// Each entry contains `name`, `description`, and `parameters`.
    pub fn schemas_for_api(&self) -> Vec<serde_json::Value> {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "parameters": t.schema(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

//! Tool dispatch from the dialogue engine to the backend.
//!
//! [`ToolDispatcher`] is the only entry point the dialogue engine sees. Every
//! call returns JSON text; validation failures, unknown names and backend
//! failures are all encoded as `{"error": "..."}` and never raised.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};

use super::registry::ToolRegistry;
use super::types::{ToolRequest, ToolResult};
use crate::backend::BackendQuery;
use crate::error::AgentError;

/// Routes named tool calls through the backend query client.
pub struct ToolDispatcher {
    registry: ToolRegistry,
    backend: Arc<dyn BackendQuery>,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry, backend: Arc<dyn BackendQuery>) -> Self {
        Self { registry, backend }
    }

    /// Dispatcher with the four SmartQ tools registered.
    pub fn smartq(backend: Arc<dyn BackendQuery>) -> Self {
        Self::new(ToolRegistry::smartq(), backend)
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Tool schemas to hand to the dialogue engine.
    pub fn schemas_for_api(&self) -> Vec<Value> {
        self.registry.schemas_for_api()
    }

    pub async fn get_room_queue(&self, room_code: &str) -> String {
        self.invoke("get_room_queue", &json!({ "room_code": room_code }))
            .await
    }

    pub async fn get_room_details(&self, room_code: &str) -> String {
        self.invoke("get_room_details", &json!({ "room_code": room_code }))
            .await
    }

    pub async fn get_shop_details(&self, identifier: &str) -> String {
        self.invoke("get_shop_details", &json!({ "identifier": identifier }))
            .await
    }

    pub async fn browse_rooms(&self, search: Option<&str>, category: Option<&str>) -> String {
        let mut args = serde_json::Map::new();
        if let Some(search) = search {
            args.insert("search".to_owned(), Value::from(search));
        }
        if let Some(category) = category {
            args.insert("category".to_owned(), Value::from(category));
        }
        self.invoke("browse_rooms", &Value::Object(args)).await
    }

    /// Invoke a tool by name with engine-supplied JSON arguments.
    pub async fn invoke(&self, name: &str, args: &Value) -> String {
        self.invoke_result(name, args).await.to_text()
    }

    /// Like [`invoke`](Self::invoke) but returns the structured result.
    pub async fn invoke_result(&self, name: &str, args: &Value) -> ToolResult {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = name, "dialogue engine requested unknown tool");
            return ToolResult::error(format!("Unknown tool: {name}"));
        };

        match tool.build_request(args) {
            Ok(request) => self.execute(&request).await,
            Err(AgentError::Tool(message)) => {
                warn!(tool = name, error = %message, "rejected tool arguments");
                ToolResult::Error(message)
            }
            Err(e) => ToolResult::Error(e.to_string()),
        }
    }

    /// Send an already-normalized request to the backend.
    pub async fn execute(&self, request: &ToolRequest) -> ToolResult {
        let started = std::time::Instant::now();
        let result = self.backend.query(request).await;
        info!(
            action = %request.action,
            ok = !result.is_error(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "tool dispatched"
        );
        result
    }
}

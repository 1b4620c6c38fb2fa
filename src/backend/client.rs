//! HTTP client for the backend agent-query endpoint.
//!
//! Every call is a single `POST` of `{"action", "params"}` with the shared
//! secret in the `x-agent-secret` header. There are no retries: one failed
//! attempt is final and comes back as [`ToolResult::Error`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::{AgentError, Result};
use crate::tools::types::{ToolRequest, ToolResult};

/// Header carrying the shared agent secret.
pub const AGENT_SECRET_HEADER: &str = "x-agent-secret";

/// A component that can answer tool requests.
///
/// Implementations never fail: every failure is folded into
/// [`ToolResult::Error`].
#[async_trait]
pub trait BackendQuery: Send + Sync {
    async fn query(&self, request: &ToolRequest) -> ToolResult;
}

/// Backend query client backed by `reqwest`.
pub struct BackendClient {
    client: reqwest::Client,
    url: String,
    secret: String,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("url", &self.url)
            .finish()
    }
}

impl BackendClient {
    /// Build a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Backend`] if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Backend(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.query_url(),
            secret: config.agent_secret.clone(),
        })
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, request: &ToolRequest) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.url)
            .header(AGENT_SECRET_HEADER, &self.secret)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::Backend(describe(&e)))?
            .error_for_status()
            .map_err(|e| AgentError::Backend(describe(&e)))?;

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| AgentError::Backend(format!("invalid response body: {}", describe(&e))))
    }
}

/// Render an error with its source chain, e.g.
/// `error sending request for url (..): client error (Connect): Connection refused`.
fn describe(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[async_trait]
impl BackendQuery for BackendClient {
    async fn query(&self, request: &ToolRequest) -> ToolResult {
        debug!(action = %request.action, params = ?request.params, "backend query");
        match self.send(request).await {
            Ok(payload) => ToolResult::Payload(payload),
            Err(e) => {
                let message = match e {
                    AgentError::Backend(m) => m,
                    other => other.to_string(),
                };
                warn!(action = %request.action, error = %message, "backend query failed");
                ToolResult::Error(format!("Could not reach backend: {message}"))
            }
        }
    }
}

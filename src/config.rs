//! Configuration for the voice orchestrator.
//!
//! Values are resolved once at process start: defaults, then an optional
//! TOML file, then environment overrides. The resulting [`AgentConfig`] is
//! passed by value into the components that need it.

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the backend base address.
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
/// Environment variable holding the shared agent secret.
pub const ENV_AGENT_SECRET: &str = "AGENT_SECRET";
/// Environment variable overriding the latency log location.
pub const ENV_LATENCY_LOG: &str = "SMARTQ_LATENCY_LOG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Backend query service settings.
    pub backend: BackendConfig,
    /// Response latency log settings.
    pub latency: LatencyConfig,
}

/// Backend query service connection settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base address, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Shared secret sent as the `x-agent-secret` header.
    pub agent_secret: String,
    /// Path of the agent-query endpoint under `base_url`.
    pub query_path: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_owned(),
            agent_secret: "smartq-agent-secret-2024".to_owned(),
            query_path: "/api/voice/agent-query".to_owned(),
            timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("agent_secret", &"[REDACTED]")
            .field("query_path", &self.query_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl BackendConfig {
    /// Full URL of the agent-query endpoint.
    pub fn query_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.query_path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Response latency log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Whether latency lines are appended to `log_path`.
    ///
    /// When disabled, measurements are still emitted to the tracing stream.
    pub enabled: bool,
    /// Append-only log file.
    pub log_path: PathBuf,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_path: PathBuf::from("latency.txt"),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a TOML file.
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AgentError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| AgentError::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides using an explicit variable lookup.
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe out a default.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = read(ENV_BACKEND_URL) {
            self.backend.base_url = url;
        }
        if let Some(secret) = read(ENV_AGENT_SECRET) {
            self.backend.agent_secret = secret;
        }
        if let Some(path) = read(ENV_LATENCY_LOG) {
            self.latency.log_path = PathBuf::from(path);
        }
    }

    /// Reject values the backend client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let base = self.backend.base_url.trim();
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(AgentError::Config(format!(
                "backend.base_url must start with http:// or https:// (got {base:?})"
            )));
        }
        if self.backend.timeout_secs == 0 {
            return Err(AgentError::Config(
                "backend.timeout_secs must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

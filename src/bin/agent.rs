//! SmartQ voice agent over stdin/stdout.
//!
//! Reads speech pipeline messages as newline-delimited JSON from stdin and
//! writes host events to stdout. All tracing output goes to stderr so that
//! stdout remains a clean protocol channel.

use std::path::PathBuf;

use anyhow::Context;
use smartq_voice::host::run_stdio_agent;
use smartq_voice::{AgentConfig, ConversationBootstrap, Persona};

/// Optional TOML configuration file.
const ENV_CONFIG: &str = "SMARTQ_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // A missing .env.local is normal outside development.
    if let Err(e) = dotenvy::from_filename(".env.local") {
        tracing::debug!(error = %e, "no .env.local loaded");
    }

    let mut config = match std::env::var_os(ENV_CONFIG) {
        Some(path) => {
            let path = PathBuf::from(path);
            AgentConfig::load(&path)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => AgentConfig::default(),
    };
    config.apply_env_overrides();
    tracing::info!(backend = ?config.backend, latency = ?config.latency, "smartq-agent starting");

    let bootstrap = ConversationBootstrap::from_config(&config, Persona::smartq())
        .context("building conversation components")?;

    let stats = run_stdio_agent(&bootstrap).await.map_err(|e| {
        tracing::error!(error = %e, "smartq-agent exited with error");
        anyhow::anyhow!("smartq-agent failed: {e}")
    })?;

    tracing::info!(
        transitions = stats.transitions,
        measured = stats.measured,
        "smartq-agent shut down cleanly"
    );
    Ok(())
}

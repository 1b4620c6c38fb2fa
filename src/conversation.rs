//! Conversation bootstrap: wiring one live session.
//!
//! Startup order matters. Both pipeline subscriptions are taken and their
//! consumers spawned before the pipeline is started, so no turn-state event
//! or tool call emitted during startup is lost. Only then is the opening
//! greeting requested.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::BackendClient;
use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::latency::LatencyRecorder;
use crate::personality::{GREETING_INSTRUCTIONS, Persona};
use crate::pipeline::{ToolInvocation, VoicePipeline};
use crate::session::{Session, SessionStateTracker, SessionStats};
use crate::tools::ToolDispatcher;

/// Process-wide components shared by every conversation.
///
/// Built once; each [`start`](Self::start) creates a fresh [`Session`].
#[derive(Clone)]
pub struct ConversationBootstrap {
    persona: Persona,
    dispatcher: Arc<ToolDispatcher>,
    recorder: Arc<LatencyRecorder>,
}

impl ConversationBootstrap {
    pub fn new(
        persona: Persona,
        dispatcher: Arc<ToolDispatcher>,
        recorder: Arc<LatencyRecorder>,
    ) -> Self {
        Self {
            persona,
            dispatcher,
            recorder,
        }
    }

    /// Build the backend client, tool dispatcher and latency recorder from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] for invalid configuration and
    /// [`AgentError::Backend`] if the HTTP client cannot be built.
    pub fn from_config(config: &AgentConfig, persona: Persona) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(BackendClient::new(&config.backend)?);
        info!(endpoint = backend.url(), "backend query client ready");
        let dispatcher = Arc::new(ToolDispatcher::smartq(backend));
        let recorder = Arc::new(LatencyRecorder::from_config(&config.latency));
        Ok(Self::new(persona, dispatcher, recorder))
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn dispatcher(&self) -> &Arc<ToolDispatcher> {
        &self.dispatcher
    }

    /// Start a conversation on `pipeline`.
    pub async fn start<P>(&self, pipeline: &mut P) -> Result<LiveConversation>
    where
        P: VoicePipeline + ?Sized,
    {
        let session = Session::new(self.persona.clone());
        let session_id = session.id();
        info!(%session_id, "starting conversation");

        let turn_states = pipeline.subscribe_turn_states()?;
        let tool_calls = pipeline.subscribe_tool_calls()?;

        let cancel = CancellationToken::new();
        let tracker = SessionStateTracker::new(session, Arc::clone(&self.recorder));
        let tracker_task = tokio::spawn(tracker.run(turn_states, cancel.clone()));
        let tool_task = tokio::spawn(serve_tool_calls(
            session_id,
            Arc::clone(&self.dispatcher),
            tool_calls,
            cancel.clone(),
        ));

        let live = LiveConversation {
            session_id,
            cancel,
            tracker_task,
            tool_task,
        };

        let started = async {
            pipeline
                .start(self.persona.instructions(), self.dispatcher.schemas_for_api())
                .await?;
            pipeline.generate_reply(GREETING_INSTRUCTIONS).await
        }
        .await;

        if let Err(e) = started {
            warn!(%session_id, error = %e, "conversation failed to start");
            live.shutdown().await;
            return Err(e);
        }

        info!(%session_id, "conversation live; greeting requested");
        Ok(live)
    }
}

/// Handle to a running conversation.
#[derive(Debug)]
pub struct LiveConversation {
    session_id: Uuid,
    cancel: CancellationToken,
    tracker_task: JoinHandle<SessionStats>,
    tool_task: JoinHandle<()>,
}

impl LiveConversation {
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Token that ends the session when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for the turn-state stream to close, then abandon pending tool work.
    pub async fn closed(self) -> Result<SessionStats> {
        let Self {
            session_id,
            cancel,
            tracker_task,
            tool_task,
        } = self;

        let stats = tracker_task
            .await
            .map_err(|e| AgentError::Session(format!("turn-state tracker failed: {e}")))?;
        cancel.cancel();
        tool_task
            .await
            .map_err(|e| AgentError::Session(format!("tool server failed: {e}")))?;
        info!(%session_id, measured = stats.measured, "conversation closed");
        Ok(stats)
    }

    /// End the session now, abandoning in-flight work.
    pub async fn shutdown(self) -> SessionStats {
        let session_id = self.session_id;
        self.cancel.cancel();
        let stats = match self.tracker_task.await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(%session_id, error = %e, "turn-state tracker failed");
                SessionStats::default()
            }
        };
        if let Err(e) = self.tool_task.await {
            warn!(%session_id, error = %e, "tool server failed");
        }
        info!(%session_id, "conversation shut down");
        stats
    }
}

/// Serve tool calls concurrently until the stream closes or the session ends.
///
/// Each call races the session's cancellation token; once the session is
/// gone, pending results are dropped instead of delivered.
async fn serve_tool_calls(
    session_id: Uuid,
    dispatcher: Arc<ToolDispatcher>,
    mut calls: mpsc::UnboundedReceiver<ToolInvocation>,
    cancel: CancellationToken,
) {
    let tasks = TaskTracker::new();
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            call = calls.recv() => match call {
                Some(call) => {
                    tasks.spawn(handle_tool_call(
                        session_id,
                        Arc::clone(&dispatcher),
                        call,
                        cancel.clone(),
                    ));
                }
                None => break,
            },
        }
    }
    tasks.close();
    tasks.wait().await;
}

async fn handle_tool_call(
    session_id: Uuid,
    dispatcher: Arc<ToolDispatcher>,
    call: ToolInvocation,
    cancel: CancellationToken,
) {
    let ToolInvocation {
        call_id,
        name,
        arguments,
        reply,
    } = call;
    debug!(%session_id, %call_id, tool = %name, "tool call received");

    let output = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!(%session_id, %call_id, "session ended; abandoning tool call");
            return;
        }
        output = dispatcher.invoke(&name, &arguments) => output,
    };

    if cancel.is_cancelled() || reply.send(output).is_err() {
        debug!(%session_id, %call_id, "session closed before tool result could be delivered");
    }
}

//! JSON-lines [`VoicePipeline`] over an async reader/writer pair.
//!
//! Reads [`PipelineMessage`] lines from the speech pipeline process and
//! writes [`HostEvent`] lines back. With stdin/stdout this is the transport
//! of the `smartq-agent` binary; stdout is reserved for the protocol, so all
//! diagnostics must go to stderr.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use super::contract::{HostEvent, PipelineMessage};
use crate::conversation::ConversationBootstrap;
use crate::error::{AgentError, Result};
use crate::pipeline::{ToolInvocation, TurnStateChanged, VoicePipeline};
use crate::session::SessionStats;

type Shared<W> = Arc<Mutex<W>>;

/// A speech pipeline reached through newline-delimited JSON.
pub struct JsonLinePipeline<R, W> {
    reader: Option<R>,
    writer: Shared<W>,
    turn_tx: Option<mpsc::UnboundedSender<TurnStateChanged>>,
    turn_rx: Option<mpsc::UnboundedReceiver<TurnStateChanged>>,
    tool_tx: Option<mpsc::UnboundedSender<ToolInvocation>>,
    tool_rx: Option<mpsc::UnboundedReceiver<ToolInvocation>>,
    reader_task: Option<JoinHandle<Result<()>>>,
}

/// The stdin/stdout pipeline used by the agent binary.
pub type StdioPipeline = JsonLinePipeline<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioPipeline {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> JsonLinePipeline<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(reader: R, writer: W) -> Self {
        let (turn_tx, turn_rx) = mpsc::unbounded_channel();
        let (tool_tx, tool_rx) = mpsc::unbounded_channel();
        Self {
            reader: Some(reader),
            writer: Arc::new(Mutex::new(writer)),
            turn_tx: Some(turn_tx),
            turn_rx: Some(turn_rx),
            tool_tx: Some(tool_tx),
            tool_rx: Some(tool_rx),
            reader_task: None,
        }
    }

    /// Wait for the inbound stream to finish (EOF or `session_end`).
    pub async fn finished(&mut self) -> Result<()> {
        match self.reader_task.take() {
            Some(task) => task
                .await
                .map_err(|e| AgentError::Channel(format!("pipeline reader failed: {e}")))?,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R, W> VoicePipeline for JsonLinePipeline<R, W>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn subscribe_turn_states(&mut self) -> Result<mpsc::UnboundedReceiver<TurnStateChanged>> {
        self.turn_rx
            .take()
            .ok_or_else(|| AgentError::Session("turn-state stream already subscribed".into()))
    }

    fn subscribe_tool_calls(&mut self) -> Result<mpsc::UnboundedReceiver<ToolInvocation>> {
        self.tool_rx
            .take()
            .ok_or_else(|| AgentError::Session("tool-call stream already subscribed".into()))
    }

    async fn start(&mut self, instructions: &str, tools: Vec<serde_json::Value>) -> Result<()> {
        let (Some(reader), Some(turn_tx), Some(tool_tx)) =
            (self.reader.take(), self.turn_tx.take(), self.tool_tx.take())
        else {
            return Err(AgentError::Session("pipeline already started".into()));
        };

        write_event(
            &self.writer,
            &HostEvent::SessionStarted {
                instructions: instructions.to_owned(),
                tools,
            },
        )
        .await?;

        let writer = Arc::clone(&self.writer);
        self.reader_task = Some(tokio::spawn(read_messages(reader, writer, turn_tx, tool_tx)));
        Ok(())
    }

    async fn generate_reply(&mut self, instructions: &str) -> Result<()> {
        write_event(
            &self.writer,
            &HostEvent::GenerateReply {
                instructions: instructions.to_owned(),
            },
        )
        .await
    }
}

/// Route inbound lines until EOF or `session_end`.
async fn read_messages<R, W>(
    reader: R,
    writer: Shared<W>,
    turn_tx: mpsc::UnboundedSender<TurnStateChanged>,
    tool_tx: mpsc::UnboundedSender<ToolInvocation>,
) -> Result<()>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    let responders = TaskTracker::new();

    loop {
        line.clear();
        let bytes_read = reader
            .read_line(&mut line)
            .await
            .map_err(|e| AgentError::Channel(format!("failed to read pipeline input: {e}")))?;
        if bytes_read == 0 {
            info!("pipeline input closed (EOF)");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let message: PipelineMessage = match serde_json::from_str(trimmed) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, raw_line = %trimmed, "failed to parse pipeline message");
                let event = HostEvent::ProtocolError {
                    message: format!("failed to parse pipeline message: {e}"),
                };
                write_event(&writer, &event).await?;
                continue;
            }
        };

        match message {
            PipelineMessage::AgentStateChanged {
                old_state,
                new_state,
            } => {
                if turn_tx
                    .send(TurnStateChanged {
                        old_state,
                        new_state,
                    })
                    .is_err()
                {
                    debug!("turn-state consumer gone; dropping event");
                }
            }
            PipelineMessage::ToolCall {
                call_id,
                name,
                arguments,
            } => {
                let (invocation, result_rx) =
                    ToolInvocation::new(call_id.clone(), name.clone(), arguments);
                if tool_tx.send(invocation).is_err() {
                    debug!(%call_id, "tool-call consumer gone; dropping call");
                    continue;
                }
                let writer = Arc::clone(&writer);
                responders.spawn(async move {
                    let Ok(output) = result_rx.await else {
                        debug!(%call_id, "tool call abandoned");
                        return;
                    };
                    let event = HostEvent::ToolResult {
                        call_id,
                        name,
                        output,
                    };
                    if let Err(e) = write_event(&writer, &event).await {
                        warn!(error = %e, "failed to write tool result");
                    }
                });
            }
            PipelineMessage::SessionEnd => {
                info!("pipeline reported session end");
                break;
            }
        }
    }

    // Closing both streams ends the session's consumers.
    drop(turn_tx);
    drop(tool_tx);
    responders.close();
    responders.wait().await;
    Ok(())
}

/// Write one event as a JSON line and flush.
async fn write_event<W>(writer: &Mutex<W>, event: &HostEvent) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut json = serde_json::to_string(event)
        .map_err(|e| AgentError::Channel(format!("failed to serialize host event: {e}")))?;
    json.push('\n');

    let mut w = writer.lock().await;
    w.write_all(json.as_bytes())
        .await
        .map_err(|e| AgentError::Channel(format!("failed to write host event: {e}")))?;
    w.flush()
        .await
        .map_err(|e| AgentError::Channel(format!("failed to flush host event: {e}")))?;
    Ok(())
}

/// Run one conversation over stdin/stdout until the pipeline ends it.
pub async fn run_stdio_agent(bootstrap: &ConversationBootstrap) -> Result<SessionStats> {
    let mut pipeline = StdioPipeline::stdio();
    let conversation = bootstrap.start(&mut pipeline).await?;
    let stats = conversation.closed().await?;
    pipeline.finished().await?;
    Ok(stats)
}

//! Turn-state tracking and latency capture.
//!
//! The [`SessionStateTracker`] is the single consumer of a session's
//! turn-state stream. Events are handled one at a time in arrival order, so
//! the record-and-clear step on `speaking` cannot race another transition.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::state::Session;
use crate::latency::{LatencyRecord, LatencyRecorder};
use crate::pipeline::{TurnState, TurnStateChanged};

/// Counters reported when a tracker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Turn-state events processed.
    pub transitions: u64,
    /// Latency records emitted.
    pub measured: u64,
    /// Events carrying a state name outside the known vocabulary.
    pub ignored: u64,
}

/// Drives a [`Session`] from turn-state events.
pub struct SessionStateTracker {
    session: Session,
    recorder: Arc<LatencyRecorder>,
    stats: SessionStats,
}

impl SessionStateTracker {
    pub fn new(session: Session, recorder: Arc<LatencyRecorder>) -> Self {
        Self {
            session,
            recorder,
            stats: SessionStats::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Handle one event observed at `now`.
    ///
    /// Returns the latency record when this event closed an interval.
    pub fn handle(&mut self, event: TurnStateChanged, now: Instant) -> Option<LatencyRecord> {
        self.stats.transitions += 1;
        if let TurnState::Other(raw) = &event.new_state {
            self.stats.ignored += 1;
            debug!(session_id = %self.session.id(), state = %raw, "ignoring unknown turn state");
        }

        let elapsed = self.session.transition(event.new_state, now)?;
        let record = self.recorder.record(elapsed);
        self.stats.measured += 1;
        Some(record)
    }

    /// Consume events until the stream closes or `cancel` fires.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<TurnStateChanged>,
        cancel: CancellationToken,
    ) -> SessionStats {
        let session_id = self.session.id();
        debug!(%session_id, "turn-state tracker started");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%session_id, "turn-state tracker cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Some(event) => {
                        self.handle(event, Instant::now());
                    }
                    None => break,
                },
            }
        }
        info!(
            %session_id,
            transitions = self.stats.transitions,
            measured = self.stats.measured,
            "turn-state tracker stopped"
        );
        self.stats
    }
}

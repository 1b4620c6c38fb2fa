//! The per-connection [`Session`] entity.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::personality::Persona;
use crate::pipeline::TurnState;

/// One live connection's conversational state.
///
/// Holds at most one pending latency interval: `thinking_started` is set on
/// entering `thinking` and taken exactly once by the following `speaking`.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    state: TurnState,
    thinking_started: Option<Instant>,
    persona: Persona,
}

impl Session {
    pub fn new(persona: Persona) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: TurnState::Idle,
            thinking_started: None,
            persona,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Start of the pending interval, if any.
    pub fn thinking_started(&self) -> Option<Instant> {
        self.thinking_started
    }

    /// Get-and-clear the pending interval start.
    pub fn take_thinking_start(&mut self) -> Option<Instant> {
        self.thinking_started.take()
    }

    /// Apply a turn-state change observed at `now`.
    ///
    /// Returns the completed thinking→speaking interval when this transition
    /// closes one. Entering `thinking` overwrites any stale start; entering
    /// `speaking` with nothing pending yields `None`.
    pub fn transition(&mut self, new_state: TurnState, now: Instant) -> Option<Duration> {
        let elapsed = match new_state {
            TurnState::Thinking => {
                self.thinking_started = Some(now);
                None
            }
            TurnState::Speaking => self
                .take_thinking_start()
                .map(|started| now.saturating_duration_since(started)),
            _ => None,
        };
        self.state = new_state;
        elapsed
    }
}

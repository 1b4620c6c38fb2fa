//! Persona instructions for the SmartQ voice assistant.
//!
//! The persona text is compiled into the binary from
//! `Personality/smartq-voice.md` and shared read-only across every session
//! through a cheap [`Persona`] handle.

use std::sync::Arc;

/// The SmartQ assistant persona.
pub const SMARTQ_PERSONA: &str = include_str!("../Personality/smartq-voice.md");

/// One-shot instruction issued once a session is live.
pub const GREETING_INSTRUCTIONS: &str = "Greet the user warmly, introduce yourself as the \
SmartQ voice assistant, and ask how you can help them today.";

/// Immutable persona instructions shared by reference across sessions.
#[derive(Debug, Clone)]
pub struct Persona {
    instructions: Arc<str>,
}

impl Persona {
    /// The built-in SmartQ persona.
    pub fn smartq() -> Self {
        Self::from_text(SMARTQ_PERSONA)
    }

    /// Build a persona from arbitrary instruction text.
    pub fn from_text(text: &str) -> Self {
        Self {
            instructions: Arc::from(text.trim()),
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Whether two handles point at the same instruction text allocation.
    #[cfg(test)]
    fn shares_text_with(&self, other: &Persona) -> bool {
        Arc::ptr_eq(&self.instructions, &other.instructions)
    }
}

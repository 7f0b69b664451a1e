//! Guided habit creation: a per-chat finite-state conversation.
//!
//! - `parse`: turn validation, one parser per collected field
//! - `state`: states, the accumulating draft, and the session record
//! - `engine`: session ownership, prompts, and the commit on confirmation

mod engine;
pub mod parse;
pub mod state;


pub use engine::ConversationEngine;
pub use state::State;

use habitual_core::message::Keyboard;

/// One outbound reply produced by a turn or a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Reply {
    /// Plain reply that leaves the client keyboard alone.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    /// Reply that ends a conversation and hides any offered keyboard.
    pub fn closing(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Remove,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An incoming message from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform-specific user ID.
    pub sender_id: String,
    /// Human-readable sender name (first name on Telegram).
    pub sender_name: Option<String>,
    /// Platform handle, if the user has one (Telegram `@username` without the `@`).
    #[serde(default)]
    pub sender_handle: Option<String>,
    /// Message text content.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl IncomingMessage {
    /// The identity a conversation is keyed by: the chat, falling back to the sender.
    pub fn chat_key(&self) -> &str {
        self.reply_target.as_deref().unwrap_or(&self.sender_id)
    }
}

/// Reply keyboard attached to an outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    /// Leave whatever keyboard the client shows untouched.
    #[default]
    Keep,
    /// Offer a one-time keyboard, one inner `Vec` per row.
    Choices(Vec<Vec<String>>),
    /// Hide a previously offered keyboard.
    Remove,
}

impl Keyboard {
    /// Build a choice keyboard from string rows.
    pub fn choices(rows: &[&[&str]]) -> Self {
        Self::Choices(
            rows.iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }
}

/// An outgoing message to send through a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    #[serde(default)]
    pub keyboard: Keyboard,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
}

impl OutgoingMessage {
    /// A plain text message for `target`.
    pub fn text(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::Keep,
            reply_target: Some(target.into()),
        }
    }
}

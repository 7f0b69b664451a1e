//! Message sending and command registration.

use super::TelegramChannel;
use habitual_core::{error::HabitualError, message::Keyboard};
use reqwest::StatusCode;
use tracing::{info, warn};

/// Telegram's per-message length limit.
const MAX_MESSAGE_LEN: usize = 4096;

/// Cut `text` into pieces of at most `limit` bytes, on char boundaries,
/// ending each piece after its last newline when there is one.
pub(crate) fn split_chunks(text: &str, limit: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while rest.len() > limit {
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if let Some(newline) = rest[..cut].rfind('\n') {
            cut = newline + 1;
        }
        if cut == 0 {
            cut = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }
    if !rest.is_empty() || chunks.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// Build the `reply_markup` object for a keyboard, if any.
pub(crate) fn reply_markup(keyboard: &Keyboard) -> Option<serde_json::Value> {
    match keyboard {
        Keyboard::Keep => None,
        Keyboard::Choices(rows) => Some(serde_json::json!({
            "keyboard": rows,
            "one_time_keyboard": true,
            "resize_keyboard": true,
        })),
        Keyboard::Remove => Some(serde_json::json!({ "remove_keyboard": true })),
    }
}

/// Map a failed `sendMessage` status to an error: rate limits and server
/// errors may clear up, anything else means the target is unreachable.
pub(crate) fn classify_send_failure(status: StatusCode, body: &str) -> HabitualError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        HabitualError::Channel(format!("telegram send failed ({status}): {body}"))
    } else {
        HabitualError::Undeliverable(format!("telegram send failed ({status}): {body}"))
    }
}

impl TelegramChannel {
    /// Send a text message to a specific chat. The keyboard rides on the last chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: &Keyboard,
    ) -> Result<(), HabitualError> {
        let chunks = split_chunks(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);
        let url = self.endpoint("sendMessage");

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut body = serde_json::json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if i == last {
                if let Some(markup) = reply_markup(keyboard) {
                    body["reply_markup"] = markup;
                }
            }

            let resp = self
                .http
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| HabitualError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(classify_send_failure(status, &error_text));
            }
        }

        Ok(())
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = serde_json::json!({
            "commands": [
                { "command": "start", "description": "Register and show available commands" },
                { "command": "create", "description": "Create a new habit" },
                { "command": "myhabits", "description": "List your habits" },
                { "command": "public", "description": "Browse public habits" },
                { "command": "cancel", "description": "Cancel habit creation" },
                { "command": "help", "description": "Show help" },
            ]
        });

        let url = self.endpoint("setMyCommands");
        match self.http.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => info!("Telegram bot commands registered"),
            Ok(resp) => warn!("setMyCommands failed ({})", resp.status()),
            Err(e) => warn!("setMyCommands request failed: {e}"),
        }
    }
}

//! Update polling and the `Channel` implementation.

use super::types::{TgResponse, TgUpdate};
use super::{api_endpoint, TelegramChannel};
use async_trait::async_trait;
use habitual_core::{
    error::HabitualError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Server-side wait for `getUpdates`.
const LONG_POLL_SECS: u64 = 30;
const MAX_BACKOFF_SECS: u64 = 60;

/// Convert a raw update into an incoming message.
///
/// Returns `None` for non-text updates, group chats, and users outside
/// `allowed_users` (when the list is non-empty).
pub(crate) fn incoming_from_update(
    update: TgUpdate,
    allowed_users: &[i64],
) -> Option<IncomingMessage> {
    let msg = update.message?;
    let text = msg.text?;
    let user = msg.from?;

    if !allowed_users.is_empty() && !allowed_users.contains(&user.id) {
        warn!("ignoring message from unauthorized user {}", user.id);
        return None;
    }
    if msg.chat.chat_type != "private" && !msg.chat.chat_type.is_empty() {
        debug!("telegram: ignoring {} chat {}", msg.chat.chat_type, msg.chat.id);
        return None;
    }

    Some(IncomingMessage {
        channel: "telegram".to_string(),
        sender_id: user.id.to_string(),
        sender_name: Some(user.first_name),
        sender_handle: user.username,
        text,
        timestamp: chrono::Utc::now(),
        reply_target: Some(msg.chat.id.to_string()),
    })
}

/// Doubling retry delay, reset after a good poll.
pub(crate) struct Backoff {
    secs: u64,
}

impl Backoff {
    pub(crate) fn new() -> Self {
        Self { secs: 1 }
    }

    pub(crate) fn reset(&mut self) {
        self.secs = 1;
    }

    /// The delay to wait now. Later calls grow it up to a minute.
    pub(crate) fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.secs);
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
        delay
    }
}

struct Poller {
    http: reqwest::Client,
    url: String,
    allowed_users: Arc<[i64]>,
    offset: Arc<AtomicI64>,
}

impl Poller {
    async fn fetch(&self) -> Result<Vec<TgUpdate>, String> {
        let offset = self.offset.load(Ordering::Relaxed);
        let body: TgResponse<Vec<TgUpdate>> = self
            .http
            .get(&self.url)
            .query(&[("timeout", LONG_POLL_SECS as i64), ("offset", offset)])
            .timeout(Duration::from_secs(LONG_POLL_SECS + 5))
            .send()
            .await
            .map_err(|e| format!("poll error: {e}"))?
            .json()
            .await
            .map_err(|e| format!("parse error: {e}"))?;

        if !body.ok {
            return Err(format!("API error: {}", body.description.unwrap_or_default()));
        }
        Ok(body.result.unwrap_or_default())
    }

    async fn run(self, tx: mpsc::Sender<IncomingMessage>) {
        let mut backoff = Backoff::new();
        loop {
            let updates = match self.fetch().await {
                Ok(updates) => updates,
                Err(e) => {
                    let delay = backoff.next_delay();
                    error!("telegram {e} (retry in {}s)", delay.as_secs());
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };
            backoff.reset();

            if let Some(last) = updates.last() {
                self.offset.store(last.update_id + 1, Ordering::Relaxed);
            }
            for update in updates {
                let Some(incoming) = incoming_from_update(update, &self.allowed_users) else {
                    continue;
                };
                if tx.send(incoming).await.is_err() {
                    info!("telegram receiver dropped, polling stopped");
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, HabitualError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let poller = Poller {
            http: self.http.clone(),
            url: api_endpoint(&self.token, "getUpdates"),
            allowed_users: self.allowed_users.clone(),
            offset: self.offset.clone(),
        };
        info!("telegram long polling started");
        tokio::spawn(poller.run(tx));
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), HabitualError> {
        let target = message.reply_target.as_deref().ok_or_else(|| {
            HabitualError::Undeliverable("outgoing message has no reply target".into())
        })?;
        let chat_id: i64 = target.parse().map_err(|e| {
            HabitualError::Undeliverable(format!("invalid telegram chat id '{target}': {e}"))
        })?;
        self.send_text(chat_id, &message.text, &message.keyboard).await
    }

    async fn stop(&self) -> Result<(), HabitualError> {
        info!("telegram channel stopped");
        Ok(())
    }
}

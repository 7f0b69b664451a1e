//! Telegram Bot API channel: `getUpdates` long polling in, `sendMessage` out.
//!
//! Docs: <https://core.telegram.org/bots/api>

mod polling;
mod send;
pub(crate) mod types;

#[cfg(test)]
mod tests;

use habitual_core::config::TelegramConfig;
use std::sync::{atomic::AtomicI64, Arc};

/// A bot account reached over HTTPS.
pub struct TelegramChannel {
    http: reqwest::Client,
    token: String,
    /// Empty = everyone may talk to the bot.
    allowed_users: Arc<[i64]>,
    /// Next `getUpdates` offset. Zero until the first batch arrives.
    offset: Arc<AtomicI64>,
}

impl TelegramChannel {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: config.bot_token,
            allowed_users: config.allowed_users.into(),
            offset: Arc::new(AtomicI64::new(0)),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        api_endpoint(&self.token, method)
    }
}

fn api_endpoint(token: &str, method: &str) -> String {
    format!("https://api.telegram.org/bot{token}/{method}")
}

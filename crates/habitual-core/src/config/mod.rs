mod channels;
mod defaults;

#[cfg(test)]
mod tests;

pub use channels::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::HabitualError;
use defaults::*;

/// Env var consulted when `channel.telegram.bot_token` is empty.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Top-level Habitual configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Reply language ("English" or "Russian").
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            language: default_language(),
        }
    }
}

/// Store config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Conversation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Idle minutes before an unfinished conversation is discarded. 0 = never.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

impl ConversationConfig {
    pub fn session_ttl(&self) -> Option<Duration> {
        (self.session_ttl_minutes > 0).then(|| Duration::from_secs(self.session_ttl_minutes * 60))
    }
}

/// Scheduler configuration -- reminder matching cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// How far (in minutes) from a habit's time a tick may still fire it.
    #[serde(default = "default_tolerance")]
    pub tolerance_minutes: u32,
    /// Channel reminders are delivered through.
    #[serde(default = "default_notify_channel")]
    pub channel: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: default_poll_interval(),
            tolerance_minutes: default_tolerance(),
            channel: default_notify_channel(),
        }
    }
}

/// Reminder delivery worker pool and retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Total delivery attempts per occurrence, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry.
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Fill an empty Telegram token from `env_token`.
fn apply_token_fallback(config: &mut Config, env_token: Option<String>) {
    let Some(token) = env_token.filter(|t| !t.is_empty()) else {
        return;
    };
    let tg = config.channel.telegram.get_or_insert_with(|| TelegramConfig {
        enabled: true,
        ..Default::default()
    });
    if tg.bot_token.is_empty() {
        tg.bot_token = token;
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, HabitualError> {
    let path = Path::new(path);
    let mut config = if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HabitualError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| HabitualError::Config(format!("failed to parse config: {}", e)))?
    };

    apply_token_fallback(&mut config, std::env::var(BOT_TOKEN_ENV).ok());
    Ok(config)
}

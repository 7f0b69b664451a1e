use thiserror::Error;

/// Top-level error type for Habitual.
#[derive(Debug, Error)]
pub enum HabitualError {
    /// Transient failure talking to a messaging channel (network, rate limit, 5xx).
    #[error("channel error: {0}")]
    Channel(String),

    /// The channel refused the target outright (blocked bot, unknown chat).
    #[error("undeliverable: {0}")]
    Undeliverable(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Storage error.
    #[error("store error: {0}")]
    Store(String),

    /// A record failed domain validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated (e.g. username taken).
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HabitualError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Channel(_) | Self::Store(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(HabitualError::Channel("timeout".into()).is_transient());
        assert!(HabitualError::Store("locked".into()).is_transient());
        assert!(!HabitualError::Undeliverable("blocked".into()).is_transient());
        assert!(!HabitualError::Validation("bad".into()).is_transient());
        assert!(!HabitualError::Conflict("taken".into()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let e = HabitualError::Undeliverable("bot was blocked by the user".into());
        assert_eq!(e.to_string(), "undeliverable: bot was blocked by the user");
    }
}

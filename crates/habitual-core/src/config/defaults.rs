//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Habitual".to_string()
}

pub fn default_data_dir() -> String {
    "~/.habitual".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_language() -> String {
    "English".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_db_path() -> String {
    "~/.habitual/data/habits.db".to_string()
}

pub fn default_session_ttl() -> u64 {
    30
}

pub fn default_poll_interval() -> u64 {
    60
}

pub fn default_tolerance() -> u32 {
    5
}

pub fn default_notify_channel() -> String {
    "telegram".to_string()
}

pub fn default_workers() -> usize {
    4
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_backoff_secs() -> u64 {
    2
}

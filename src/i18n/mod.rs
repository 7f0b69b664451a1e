//! Internationalization: localized strings for bot replies and reminders.
//!
//! `t(key, lang)` returns static strings; the functions in `format`
//! build strings with interpolation.
//! Supported languages: English (fallback) and Russian.

mod format;
mod prompts;
mod replies;

#[cfg(test)]
mod tests;

pub use format::*;

/// Return a localized static string for `key` in the given `lang`.
/// Falls back to English for unsupported languages.
pub fn t(key: &str, lang: &str) -> &'static str {
    if let Some(v) = prompts::lookup(key, lang) {
        return v;
    }
    if let Some(v) = replies::lookup(key, lang) {
        return v;
    }
    "???"
}

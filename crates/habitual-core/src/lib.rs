//! # habitual-core
//!
//! Core types, collaborator traits, configuration, and error handling for Habitual.

pub mod config;
pub mod error;
pub mod habit;
pub mod message;
pub mod traits;

pub use config::shellexpand;

//! # habitual-store
//!
//! Persistent user and habit storage for Habitual (SQLite-backed).

pub mod store;

pub use store::Store;

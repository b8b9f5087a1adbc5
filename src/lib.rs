//! Cache Holder - compact per-entry records for concurrent in-memory caches
//!
//! Each entry holder tracks its value, narrow creation and access timestamps,
//! idle and absolute TTLs, a use counter and a one-shot release.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{EntryHolder, EntryStore};
pub use config::Config;
pub use tasks::spawn_cleanup_task;

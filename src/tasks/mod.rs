//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a store is live.
//!
//! # Tasks
//! - Expiry sweep: Releases invalid holders at configured intervals

mod cleanup;

pub use cleanup::spawn_cleanup_task;

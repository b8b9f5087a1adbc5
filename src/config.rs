//! Configuration Module
//!
//! Loads store configuration from environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{FixedExpiryPolicy, IdleExpiry, WriteMode};

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Idle TTL in seconds assigned to new entries
    pub default_idle_secs: i32,
    /// Idle TTL in seconds assigned on overwrite; `None` keeps the previous one
    pub update_idle_secs: Option<i32>,
    /// Absolute TTL in seconds; 0 means no limit
    pub max_cache_secs: i64,
    /// Upper bound for randomized absolute TTLs; 0 disables jitter
    pub expire_jitter_secs: u64,
    /// How values are stored in their holders
    pub write_mode: WriteMode,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_IDLE_SECS` - Idle TTL on creation (default: 300)
    /// - `UPDATE_IDLE_SECS` - Idle TTL on overwrite (default: unset, keep previous)
    /// - `MAX_CACHE_SECS` - Absolute TTL (default: 0)
    /// - `EXPIRE_JITTER_SECS` - Jitter bound for absolute TTLs (default: 0)
    /// - `WRITE_MODE` - `identity`, `serialize` or `intern` (default: identity)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_idle_secs: parse_var("DEFAULT_IDLE_SECS").unwrap_or(defaults.default_idle_secs),
            update_idle_secs: parse_var("UPDATE_IDLE_SECS"),
            max_cache_secs: parse_var("MAX_CACHE_SECS").unwrap_or(defaults.max_cache_secs),
            expire_jitter_secs: parse_var("EXPIRE_JITTER_SECS")
                .unwrap_or(defaults.expire_jitter_secs),
            write_mode: parse_var("WRITE_MODE").unwrap_or(defaults.write_mode),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }

    /// Expiry policy derived from the idle TTL settings.
    pub fn expiry_policy(&self) -> FixedExpiryPolicy {
        FixedExpiryPolicy {
            on_creation: IdleExpiry::Seconds(self.default_idle_secs),
            on_update: self
                .update_idle_secs
                .map_or(IdleExpiry::NoChange, IdleExpiry::Seconds),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        warn!(variable = name, value = %raw, "Ignoring unparsable environment variable");
    }
    parsed
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_idle_secs: 300,
            update_idle_secs: None,
            max_cache_secs: 0,
            expire_jitter_secs: 0,
            write_mode: WriteMode::Identity,
            cleanup_interval: 1,
        }
    }
}

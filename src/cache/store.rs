//! Entry Store Module
//!
//! Keyed store that owns entry holders and publishes them only after completion.
//! Structural changes take `&mut self`; reads take `&self` and rely on the
//! holder's own atomics, so readers can share a read lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{
    CacheStats, Clock, Codec, EntryHolder, ExpiryPolicy, JsonCodec, StatsSnapshot, WriteMode,
};
use crate::config::Config;
use crate::error::{Result, StoreError};

// == Entry Store ==
/// Map of keys to published holders.
pub struct EntryStore<V, C = JsonCodec> {
    /// Published, complete holders
    entries: HashMap<String, Arc<EntryHolder<V, C>>>,
    clock: Arc<dyn Clock>,
    policy: Arc<dyn ExpiryPolicy>,
    stats: CacheStats,
    write_mode: WriteMode,
    /// Absolute TTL in seconds applied on completion
    max_cache_secs: i64,
    /// Jitter bound for absolute TTLs; zero disables jitter
    expire_jitter: Duration,
}

impl<V, C: Codec<V>> EntryStore<V, C> {
    // == Constructor ==
    /// Creates a store using the configured TTLs and write mode.
    pub fn new(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            policy: Arc::new(config.expiry_policy()),
            stats: CacheStats::new(),
            write_mode: config.write_mode,
            max_cache_secs: config.max_cache_secs,
            expire_jitter: Duration::from_secs(config.expire_jitter_secs),
        }
    }

    /// Replaces the expiry policy derived from the configuration.
    pub fn with_policy(mut self, policy: Arc<dyn ExpiryPolicy>) -> Self {
        self.policy = policy;
        self
    }

    // == Put ==
    /// Stores a value, replacing and releasing any previous holder for the key.
    ///
    /// The new holder is completed before it is inserted, so readers never see
    /// it in its incomplete state.
    pub fn put(&mut self, key: String, value: V) -> Result<()> {
        let holder = EntryHolder::new(value, self.write_mode, self.clock.as_ref())?;

        let previous = self.entries.get(&key).map(|holder| &**holder);
        holder.set_idle_time_from_policy(previous.is_some(), self.policy.as_ref(), previous);
        holder.complete(i64::from(holder.max_idle_time()), self.max_cache_secs);
        if !self.expire_jitter.is_zero() {
            holder.set_random_expiry_within(self.expire_jitter, &mut rand::thread_rng());
        }

        if let Some(replaced) = self.entries.insert(key, Arc::new(holder)) {
            replaced.release();
        }
        self.stats.record_put();

        Ok(())
    }

    // == Get ==
    /// Returns the value for `key`, recording an access.
    ///
    /// Invalid holders are reported as expired but left for the sweep to remove.
    pub fn get(&self, key: &str) -> Result<Arc<V>> {
        let Some(holder) = self.entries.get(key) else {
            self.stats.record_miss();
            return Err(StoreError::NotFound(key.to_string()));
        };

        if holder.is_invalid(self.clock.as_ref()) {
            self.stats.record_miss();
            return Err(StoreError::Expired(key.to_string()));
        }

        match holder.get(self.clock.as_ref())? {
            Some(value) => {
                holder.increment_use_count();
                self.stats.record_hit();
                Ok(value)
            }
            None => {
                self.stats.record_miss();
                Err(StoreError::Expired(key.to_string()))
            }
        }
    }

    // == Peek ==
    /// Returns the value for `key` without recording an access or statistics.
    pub fn peek(&self, key: &str) -> Result<Arc<V>> {
        let holder = self
            .entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        if holder.is_invalid(self.clock.as_ref()) {
            return Err(StoreError::Expired(key.to_string()));
        }

        holder
            .peek()?
            .ok_or_else(|| StoreError::Expired(key.to_string()))
    }
}

impl<V, C> EntryStore<V, C> {
    // == Holder ==
    /// Returns the published holder for `key`.
    pub fn holder(&self, key: &str) -> Option<Arc<EntryHolder<V, C>>> {
        self.entries.get(key).cloned()
    }

    // == Touch ==
    /// Prolongs the idle deadline of `key`; see [`EntryHolder::update_idle_time`].
    pub fn touch(&self, key: &str, idle_secs: i32) -> Result<()> {
        let holder = self
            .entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        holder.update_idle_time(idle_secs, self.clock.as_ref());
        Ok(())
    }

    // == Remove ==
    /// Removes and releases the holder for `key`.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        let holder = self
            .entries
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;

        if holder.release() {
            self.stats.record_removal();
        }
        Ok(())
    }

    // == Cleanup Expired ==
    /// Removes every invalid holder, sampling the clock once.
    ///
    /// Returns the number of holders this sweep released. Holders already released
    /// elsewhere are dropped from the map but not counted.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_millis();
        let clock = self.clock.as_ref();

        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, holder)| holder.is_invalid_at(now, clock))
            .map(|(key, _)| key.clone())
            .collect();

        let mut released = 0;
        for key in expired_keys {
            if let Some(holder) = self.entries.remove(&key) {
                if holder.release() {
                    self.stats.record_expiration();
                    released += 1;
                }
            }
        }

        debug!(released, remaining = self.entries.len(), "Expiry sweep finished");
        released
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.entries.len())
    }

    /// Number of published holders, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no holder is published.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

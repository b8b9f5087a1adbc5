//! Clock Module
//!
//! Millisecond time source shared by all holders of a cache.
//!
//! Holders store timestamps as signed 32-bit millisecond offsets from a base epoch
//! that is fixed once per process. An `i32` offset covers `i32::MAX` ms, roughly
//! 24.8 days past the base epoch; beyond that the offset wraps. All holders of one
//! cache must be read against the same clock.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;

use chrono::Utc;

/// Span covered by a narrow offset before it wraps, in milliseconds.
pub const OFFSET_SPAN_MILLIS: i64 = i32::MAX as i64;

// == Clock Trait ==
/// Source of "now" and of the base epoch that narrow offsets are relative to.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;

    /// Base epoch in milliseconds since the Unix epoch. Must never change.
    fn base_epoch_millis(&self) -> i64;

    /// Converts an absolute timestamp into a narrow offset from the base epoch.
    fn offset_of(&self, millis: i64) -> i32 {
        // Truncating cast: wraps once the distance exceeds OFFSET_SPAN_MILLIS.
        millis.wrapping_sub(self.base_epoch_millis()) as i32
    }

    /// Converts a narrow offset back into an absolute timestamp.
    fn millis_of(&self, offset: i32) -> i64 {
        self.base_epoch_millis() + i64::from(offset)
    }
}

// == System Clock ==
/// Wall clock backed by `chrono::Utc`, with a base epoch captured on first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

static PROCESS_BASE_EPOCH: OnceLock<i64> = OnceLock::new();

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }

    fn base_epoch_millis(&self) -> i64 {
        *PROCESS_BASE_EPOCH.get_or_init(|| Utc::now().timestamp_millis())
    }
}

// == Manual Clock ==
/// Clock that only moves when told to. Used to drive expiry deterministically.
#[derive(Debug)]
pub struct ManualClock {
    base_epoch: i64,
    now: AtomicI64,
}

impl ManualClock {
    /// Creates a clock whose base epoch and current time are both `base_epoch`.
    pub fn new(base_epoch: i64) -> Self {
        Self {
            base_epoch,
            now: AtomicI64::new(base_epoch),
        }
    }

    /// Creates a clock starting at the current wall-clock time.
    pub fn starting_now() -> Self {
        Self::new(Utc::now().timestamp_millis())
    }

    /// Moves the clock forward by `millis`.
    pub fn advance_millis(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::Relaxed);
    }

    /// Moves the clock forward by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        self.advance_millis(secs * 1000);
    }

    /// Sets the current time to `millis`.
    pub fn set_millis(&self, millis: i64) {
        self.now.store(millis, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }

    fn base_epoch_millis(&self) -> i64 {
        self.base_epoch
    }
}

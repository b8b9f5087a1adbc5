//! Entry Holder Module
//!
//! Per-entry record holding a cache value (live or serialized), narrow timestamps,
//! idle and absolute TTLs, a use counter and lifecycle state.
//!
//! # Lifecycle
//! Incomplete (constructed, TTLs unset) -> Complete (TTLs assigned, publishable)
//! -> Released (payload cleared, permanently invalid).
//!
//! # Concurrency
//! Only the payload slot needs acquire/release ordering; it is swapped to empty
//! exactly once by [`EntryHolder::release`]. Timestamps, TTLs and the use counter
//! are relaxed atomics: a stale read only shifts the moment expiry is detected.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::{Clock, Codec, ExpiryPolicy, IdleExpiry, JsonCodec};
use crate::error::{HolderError, ParseModeError};

// == Write Mode ==
/// How a value is stored when a holder is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Store the value as-is
    #[default]
    Identity,
    /// Store the value through the holder's codec
    Serialize,
    /// Reserved; always rejected with `UnsupportedMode`
    Intern,
}

impl FromStr for WriteMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "identity" => Ok(Self::Identity),
            "serialize" => Ok(Self::Serialize),
            "intern" => Ok(Self::Intern),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

// == Serialization Mode ==
/// Form the payload was stored in. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationMode {
    None,
    Serializable,
}

enum StoredForm<V> {
    Value(Arc<V>),
    Serialized(Box<[u8]>),
}

// == Limit Helper ==
/// Clamps `value` into `[0, i32::MAX]`.
pub fn limit_to_positive_int(value: i64) -> i32 {
    value.clamp(0, i64::from(i32::MAX)) as i32
}

// == Entry Holder ==
/// Metadata and payload of one cache entry.
///
/// `C` is the codec used for [`WriteMode::Serialize`]. Holders for value types
/// without a serialized form use [`NoCodec`](crate::cache::NoCodec).
///
/// Methods that need the current time take the cache's [`Clock`]; every holder of
/// a cache must be read against the same clock, since offsets are relative to its
/// base epoch.
pub struct EntryHolder<V, C = JsonCodec> {
    payload: ArcSwapOption<StoredForm<V>>,
    /// Milliseconds since the clock's base epoch
    creation_offset: i32,
    /// Milliseconds since the clock's base epoch
    last_access_offset: AtomicI32,
    /// Seconds; 0 means expired
    max_idle_secs: AtomicI32,
    /// Seconds; 0 means no absolute limit
    max_cache_secs: AtomicI32,
    use_count: AtomicU32,
    mode: SerializationMode,
    complete: AtomicBool,
    _codec: PhantomData<fn() -> C>,
}

impl<V, C: Codec<V>> EntryHolder<V, C> {
    // == Constructors ==
    /// Creates an incomplete holder. It stays invalid until [`complete`](Self::complete)
    /// is called and must not be published to readers before that.
    ///
    /// # Errors
    /// - `Storage` if the codec fails to encode the value
    /// - `UnsupportedMode` for `Intern`, or for `Serialize` with a codec that has no
    ///   serialized form
    pub fn new(
        value: V,
        write_mode: WriteMode,
        clock: &(impl Clock + ?Sized),
    ) -> Result<Self, HolderError> {
        let now = clock.offset_of(clock.now_millis());

        let (mode, stored) = match write_mode {
            WriteMode::Identity => (SerializationMode::None, StoredForm::Value(Arc::new(value))),
            WriteMode::Serialize if C::SERIALIZABLE => {
                let bytes = C::encode(&value).map_err(|source| {
                    warn!(error = %source, "Failed to encode cache value");
                    HolderError::Storage {
                        mode: write_mode,
                        source,
                    }
                })?;
                (SerializationMode::Serializable, StoredForm::Serialized(bytes))
            }
            WriteMode::Serialize | WriteMode::Intern => {
                return Err(HolderError::UnsupportedMode(write_mode));
            }
        };

        Ok(Self {
            payload: ArcSwapOption::from_pointee(stored),
            creation_offset: now,
            last_access_offset: AtomicI32::new(now),
            max_idle_secs: AtomicI32::new(0),
            max_cache_secs: AtomicI32::new(0),
            use_count: AtomicU32::new(0),
            mode,
            complete: AtomicBool::new(false),
            _codec: PhantomData,
        })
    }

    /// Creates a holder that is complete and ready to publish.
    pub fn new_complete(
        value: V,
        max_idle_secs: i64,
        max_cache_secs: i64,
        write_mode: WriteMode,
        clock: &(impl Clock + ?Sized),
    ) -> Result<Self, HolderError> {
        let holder = Self::new(value, write_mode, clock)?;
        holder.complete(max_idle_secs, max_cache_secs);
        Ok(holder)
    }

    // == Complete ==
    /// Assigns both TTLs, clamped to `[0, i32::MAX]`, and marks the holder complete.
    pub fn complete(&self, max_idle_secs: i64, max_cache_secs: i64) {
        self.max_idle_secs
            .store(limit_to_positive_int(max_idle_secs), Ordering::Relaxed);
        self.max_cache_secs
            .store(limit_to_positive_int(max_cache_secs), Ordering::Relaxed);
        self.complete.store(true, Ordering::Release);
    }

    // == Value Access ==
    /// Records an access, then returns the value like [`peek`](Self::peek).
    pub fn get(&self, clock: &(impl Clock + ?Sized)) -> Result<Option<Arc<V>>, HolderError> {
        self.last_access_offset
            .store(clock.offset_of(clock.now_millis()), Ordering::Relaxed);
        self.peek()
    }

    /// Returns the value without touching access time or statistics.
    ///
    /// Returns `Ok(None)` once the holder has been released. The payload is loaded
    /// once and decoded from that snapshot, so a concurrent release cannot pull it
    /// out from under the decoder.
    pub fn peek(&self) -> Result<Option<Arc<V>>, HolderError> {
        let snapshot = self.payload.load();
        let Some(stored) = &*snapshot else {
            return Ok(None);
        };

        match &**stored {
            StoredForm::Value(value) => Ok(Some(Arc::clone(value))),
            StoredForm::Serialized(bytes) => match C::decode(bytes) {
                Ok(value) => Ok(Some(Arc::new(value))),
                Err(source) => {
                    warn!(error = %source, "Failed to decode cache value");
                    Err(HolderError::Storage {
                        mode: WriteMode::Serialize,
                        source,
                    })
                }
            },
        }
    }
}

impl<V, C> EntryHolder<V, C> {
    // == Validity ==
    /// Checks validity against the clock's current time.
    pub fn is_invalid(&self, clock: &(impl Clock + ?Sized)) -> bool {
        self.is_invalid_at(clock.now_millis(), clock)
    }

    /// Checks validity at `now_millis`. Pure; safe to call concurrently with
    /// `get` and `release`.
    ///
    /// A holder is invalid when it is incomplete or released, when its absolute TTL
    /// has elapsed since creation, when its idle TTL is `0`, or when its idle TTL
    /// has elapsed since the last access. Second counts are widened to `i64`
    /// before scaling to milliseconds.
    pub fn is_invalid_at(&self, now_millis: i64, clock: &(impl Clock + ?Sized)) -> bool {
        if !self.complete.load(Ordering::Acquire) || self.is_released() {
            return true;
        }

        let max_cache = self.max_cache_secs.load(Ordering::Relaxed);
        if max_cache > 0 {
            let cached_for = now_millis.saturating_sub(self.creation_time(clock));
            if cached_for > 1000 * i64::from(max_cache) {
                return true;
            }
        }

        let max_idle = self.max_idle_secs.load(Ordering::Relaxed);
        if max_idle == 0 {
            return true;
        }

        let idle_for = now_millis.saturating_sub(self.last_access_time(clock));
        idle_for > 1000 * i64::from(max_idle)
    }

    // == Is Complete ==
    /// Returns true once TTLs are assigned and the holder may be published.
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    // == Is Released ==
    /// Returns true once the payload has been cleared by [`release`](Self::release).
    pub fn is_released(&self) -> bool {
        self.payload.load().is_none()
    }

    // == Max Idle Time ==
    /// Idle TTL in seconds; `0` means the holder is expired.
    pub fn max_idle_time(&self) -> i32 {
        self.max_idle_secs.load(Ordering::Relaxed)
    }

    // == Max Cache Time ==
    /// Absolute TTL in seconds; `0` means no absolute limit.
    pub fn max_cache_time(&self) -> i32 {
        self.max_cache_secs.load(Ordering::Relaxed)
    }

    // == Set Max Idle Time ==
    /// Overwrites the idle TTL in seconds. Negative values are clamped to `0`.
    pub fn set_max_idle_time(&self, max_idle_secs: i32) {
        self.max_idle_secs
            .store(max_idle_secs.max(0), Ordering::Relaxed);
    }

    // == Update Idle Time ==
    /// Prolongs the idle deadline.
    ///
    /// - `0` expires the holder immediately
    /// - a positive value sets the idle TTL to the whole seconds lived so far plus
    ///   `idle_secs`, clamped to `i32::MAX`
    /// - a negative value leaves the holder unchanged
    pub fn update_idle_time(&self, idle_secs: i32, clock: &(impl Clock + ?Sized)) {
        if idle_secs == 0 {
            self.max_idle_secs.store(0, Ordering::Relaxed);
        } else if idle_secs > 0 {
            let cached_for = clock
                .now_millis()
                .saturating_sub(self.creation_time(clock))
                .max(0);
            let target = limit_to_positive_int(cached_for / 1000 + i64::from(idle_secs));
            self.max_idle_secs.store(target, Ordering::Relaxed);
        }
    }

    // == Idle Time From Policy ==
    /// Takes the idle TTL from `policy`. On [`IdleExpiry::NoChange`] the idle TTL of
    /// `previous` is carried forward; without a previous holder nothing changes.
    pub fn set_idle_time_from_policy(
        &self,
        is_update: bool,
        policy: &(impl ExpiryPolicy + ?Sized),
        previous: Option<&EntryHolder<V, C>>,
    ) {
        let decision = if is_update {
            policy.expiry_for_update()
        } else {
            policy.expiry_for_creation()
        };

        debug!(is_update, ?decision, "Applying expiry policy decision");
        match decision {
            IdleExpiry::Seconds(secs) => self.set_max_idle_time(secs),
            IdleExpiry::NoChange => {
                if let Some(previous) = previous {
                    self.max_idle_secs
                        .store(previous.max_idle_time(), Ordering::Relaxed);
                }
            }
        }
    }

    // == Random Expiry ==
    /// Jitters the absolute TTL to a random delay of at most `max_delay`.
    ///
    /// The delay is drawn uniformly from `[1, max_delay]` in whole seconds; `0` is
    /// excluded because it would mean "no absolute limit". It is adopted when no
    /// absolute TTL is set yet or when it is shorter than the current one. A
    /// `max_delay` below one second leaves the holder unchanged.
    pub fn set_random_expiry_within(&self, max_delay: Duration, rng: &mut impl Rng) {
        let max_delay_secs =
            limit_to_positive_int(i64::try_from(max_delay.as_secs()).unwrap_or(i64::MAX));
        if max_delay_secs == 0 {
            return;
        }

        let delay_secs = rng.gen_range(1..=max_delay_secs);
        let _ = self
            .max_cache_secs
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                (current == 0 || delay_secs < current).then_some(delay_secs)
            });
    }

    // == Creation Time ==
    /// Creation time in milliseconds since the Unix epoch.
    pub fn creation_time(&self, clock: &(impl Clock + ?Sized)) -> i64 {
        clock.millis_of(self.creation_offset)
    }

    // == Last Access Time ==
    /// Last access time in milliseconds since the Unix epoch.
    pub fn last_access_time(&self, clock: &(impl Clock + ?Sized)) -> i64 {
        clock.millis_of(self.last_access_offset.load(Ordering::Relaxed))
    }

    // == Increment Use Count ==
    /// Lock-free increment. Wraps on overflow.
    pub fn increment_use_count(&self) {
        self.use_count.fetch_add(1, Ordering::Relaxed);
    }

    // == Use Count ==
    /// Number of recorded uses, modulo `2^32`.
    pub fn use_count(&self) -> u32 {
        self.use_count.load(Ordering::Relaxed)
    }

    // == Serialization Mode ==
    /// Form the payload was stored in.
    pub fn serialization_mode(&self) -> SerializationMode {
        self.mode
    }

    #[cfg(test)]
    fn with_use_count(self, use_count: u32) -> Self {
        self.use_count.store(use_count, Ordering::Relaxed);
        self
    }

    // == Release ==
    /// Clears the payload. Returns `true` only for the call that performed the
    /// transition; racing and repeated calls return `false`.
    pub fn release(&self) -> bool {
        let released = self.payload.swap(None).is_some();
        if released {
            debug!(use_count = self.use_count(), "Holder released");
        }
        released
    }
}

impl<V, C> fmt::Debug for EntryHolder<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryHolder")
            .field("mode", &self.mode)
            .field("complete", &self.is_complete())
            .field("released", &self.is_released())
            .field("creation_offset", &self.creation_offset)
            .field("last_access_offset", &self.last_access_offset)
            .field("max_idle_secs", &self.max_idle_secs)
            .field("max_cache_secs", &self.max_cache_secs)
            .field("use_count", &self.use_count)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FixedExpiryPolicy, ManualClock, NoCodec};
    use crate::error::CodecError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde::de::DeserializeOwned;

    const T0: i64 = 1_700_000_000_000;

    fn clock() -> ManualClock {
        ManualClock::new(T0)
    }

    fn holder(clock: &ManualClock, idle: i64, cache: i64) -> EntryHolder<String> {
        EntryHolder::new_complete("x".to_string(), idle, cache, WriteMode::Identity, clock).unwrap()
    }

    #[test]
    fn test_new_holder_is_incomplete_and_invalid() {
        let clock = clock();
        let holder: EntryHolder<String> =
            EntryHolder::new("x".to_string(), WriteMode::Identity, &clock).unwrap();

        assert!(!holder.is_complete());
        assert!(holder.is_invalid(&clock));
        assert_eq!(holder.creation_time(&clock), T0);
        assert_eq!(holder.last_access_time(&clock), T0);
    }

    #[test]
    fn test_complete_makes_holder_valid() {
        let clock = clock();
        let holder: EntryHolder<String> =
            EntryHolder::new("x".to_string(), WriteMode::Identity, &clock).unwrap();
        holder.complete(60, 0);

        assert!(holder.is_complete());
        assert!(!holder.is_invalid(&clock));
    }

    #[test]
    fn test_complete_clamps_ttls() {
        let clock = clock();
        let holder = holder(&clock, i64::MAX, -10);

        assert_eq!(holder.max_idle_time(), i32::MAX);
        assert_eq!(holder.max_cache_time(), 0);
    }

    #[test]
    fn test_identity_peek_shares_value() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        let first = holder.peek().unwrap().unwrap();
        let second = holder.peek().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(holder.serialization_mode(), SerializationMode::None);
    }

    #[test]
    fn test_serialize_peek_round_trip() {
        let clock = clock();
        let value = vec![1u32, 2, 3];
        let holder: EntryHolder<Vec<u32>> =
            EntryHolder::new_complete(value.clone(), 60, 0, WriteMode::Serialize, &clock).unwrap();

        assert_eq!(holder.serialization_mode(), SerializationMode::Serializable);
        assert_eq!(*holder.peek().unwrap().unwrap(), value);
    }

    #[test]
    fn test_intern_mode_is_unsupported() {
        let clock = clock();
        let result: Result<EntryHolder<String>, _> =
            EntryHolder::new("x".to_string(), WriteMode::Intern, &clock);

        assert!(matches!(
            result,
            Err(HolderError::UnsupportedMode(WriteMode::Intern))
        ));
    }

    #[test]
    fn test_serialize_without_codec_is_unsupported() {
        let clock = clock();
        let result: Result<EntryHolder<String, NoCodec>, _> =
            EntryHolder::new("x".to_string(), WriteMode::Serialize, &clock);

        assert!(matches!(
            result,
            Err(HolderError::UnsupportedMode(WriteMode::Serialize))
        ));
    }

    struct FailingCodec;

    impl<V: Serialize + DeserializeOwned> Codec<V> for FailingCodec {
        fn encode(value: &V) -> std::result::Result<Box<[u8]>, CodecError> {
            <JsonCodec as Codec<V>>::encode(value)
        }

        fn decode(_bytes: &[u8]) -> std::result::Result<V, CodecError> {
            Err(CodecError::NotSerializable)
        }
    }

    #[test]
    fn test_decode_failure_leaves_payload() {
        let clock = clock();
        let holder: EntryHolder<String, FailingCodec> =
            EntryHolder::new_complete("x".to_string(), 60, 0, WriteMode::Serialize, &clock)
                .unwrap();

        assert!(matches!(holder.peek(), Err(HolderError::Storage { .. })));
        assert!(!holder.is_released());
        assert!(holder.release());
    }

    #[test]
    fn test_incomplete_is_invalid_regardless_of_ttls() {
        let clock = clock();
        let holder: EntryHolder<String> =
            EntryHolder::new("x".to_string(), WriteMode::Identity, &clock).unwrap();
        holder.set_max_idle_time(i32::MAX);

        assert!(holder.is_invalid_at(T0, &clock));
        assert!(holder.is_invalid_at(T0 + 1, &clock));
    }

    #[test]
    fn test_release_once() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        assert!(holder.release());
        assert!(!holder.release());
        assert!(holder.is_released());
        assert!(holder.peek().unwrap().is_none());
        assert!(holder.get(&clock).unwrap().is_none());
        assert!(holder.is_invalid(&clock));
    }

    #[test]
    fn test_limit_to_positive_int() {
        assert_eq!(limit_to_positive_int(i64::MAX), i32::MAX);
        assert_eq!(limit_to_positive_int(-5), 0);
        assert_eq!(limit_to_positive_int(1234), 1234);
        assert_eq!(limit_to_positive_int(i64::from(i32::MAX) + 1), i32::MAX);
    }

    #[test]
    fn test_update_idle_time_extends_from_age() {
        let clock = clock();
        let holder = holder(&clock, 1, 0);

        clock.advance_millis(10_000);
        holder.update_idle_time(5, &clock);

        assert_eq!(holder.max_idle_time(), 15);
    }

    #[test]
    fn test_update_idle_time_zero_expires() {
        let clock = clock();
        let holder = holder(&clock, 60, 3600);

        holder.update_idle_time(0, &clock);

        assert_eq!(holder.max_idle_time(), 0);
        assert!(holder.is_invalid(&clock));
    }

    #[test]
    fn test_update_idle_time_negative_is_noop() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        holder.update_idle_time(-1, &clock);
        holder.update_idle_time(i32::MIN, &clock);

        assert_eq!(holder.max_idle_time(), 60);
    }

    #[test]
    fn test_update_idle_time_saturates() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        clock.advance_secs(100);
        holder.update_idle_time(i32::MAX, &clock);

        assert_eq!(holder.max_idle_time(), i32::MAX);
    }

    #[test]
    fn test_absolute_ttl_expires_despite_access() {
        let clock = clock();
        let holder = holder(&clock, 60, 10);

        clock.advance_secs(9);
        holder.get(&clock).unwrap();
        assert!(!holder.is_invalid(&clock));

        clock.advance_secs(2);
        holder.get(&clock).unwrap();
        assert!(holder.is_invalid(&clock));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let clock = clock();
        let holder = holder(&clock, 10, 0);

        assert!(!holder.is_invalid_at(T0 + 10_000, &clock));
        assert!(holder.is_invalid_at(T0 + 10_001, &clock));
    }

    #[test]
    fn test_large_ttls_do_not_overflow() {
        let clock = clock();
        let holder = holder(&clock, i64::from(i32::MAX), i64::from(i32::MAX));

        clock.advance_secs(20 * 24 * 3600);
        assert!(!holder.is_invalid(&clock));
    }

    #[test]
    fn test_idle_scenario() {
        let clock = clock();
        let holder = holder(&clock, 10, 0);

        assert!(!holder.is_invalid_at(T0 + 9_000, &clock));
        assert!(holder.is_invalid_at(T0 + 11_000, &clock));

        clock.set_millis(T0 + 9_000);
        holder.get(&clock).unwrap();
        assert!(!holder.is_invalid_at(T0 + 18_000, &clock));
        assert!(holder.is_invalid_at(T0 + 19_001, &clock));
    }

    #[test]
    fn test_idle_time_from_policy() {
        let clock = clock();
        let previous = holder(&clock, 42, 0);
        let next: EntryHolder<String> =
            EntryHolder::new("y".to_string(), WriteMode::Identity, &clock).unwrap();

        let policy = FixedExpiryPolicy::created(30);
        next.set_idle_time_from_policy(false, &policy, None);
        assert_eq!(next.max_idle_time(), 30);

        next.set_idle_time_from_policy(true, &policy, Some(&previous));
        assert_eq!(next.max_idle_time(), 42);

        let policy = FixedExpiryPolicy::modified(7);
        next.set_idle_time_from_policy(true, &policy, Some(&previous));
        assert_eq!(next.max_idle_time(), 7);
    }

    #[test]
    fn test_idle_time_from_policy_without_previous() {
        let clock = clock();
        let holder = holder(&clock, 12, 0);

        holder.set_idle_time_from_policy(true, &FixedExpiryPolicy::created(30), None);
        assert_eq!(holder.max_idle_time(), 12);
    }

    #[test]
    fn test_random_expiry_initializes_unset_ttl() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);
        let mut rng = StdRng::seed_from_u64(7);

        holder.set_random_expiry_within(Duration::from_secs(100), &mut rng);

        let jittered = holder.max_cache_time();
        assert!((1..=100).contains(&jittered));
    }

    #[test]
    fn test_random_expiry_never_increases() {
        let clock = clock();
        let holder = holder(&clock, 60, 3);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            holder.set_random_expiry_within(Duration::from_secs(100), &mut rng);
            assert!(holder.max_cache_time() <= 3);
            assert!(holder.max_cache_time() >= 1);
        }
    }

    #[test]
    fn test_random_expiry_is_uniform() {
        let clock = clock();
        let mut rng = StdRng::seed_from_u64(40);
        let mut counts = [0u32; 5];

        for _ in 0..40_000 {
            let holder = holder(&clock, 60, 0);
            holder.set_random_expiry_within(Duration::from_secs(4), &mut rng);
            counts[holder.max_cache_time() as usize] += 1;
        }

        assert_eq!(counts[0], 0);
        for count in &counts[1..] {
            assert!((9_000..11_000).contains(count), "skewed draw: {counts:?}");
        }
    }

    #[test]
    fn test_random_expiry_one_second_bound() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);
        let mut rng = StdRng::seed_from_u64(5);

        holder.set_random_expiry_within(Duration::from_secs(1), &mut rng);
        assert_eq!(holder.max_cache_time(), 1);
    }

    #[test]
    fn test_extreme_now_does_not_overflow() {
        let clock = clock();
        let holder = holder(&clock, 10, 10);

        assert!(!holder.is_invalid_at(i64::MIN, &clock));
        assert!(holder.is_invalid_at(i64::MAX, &clock));
    }

    #[test]
    fn test_use_count_wraps() {
        let clock = clock();
        let holder = holder(&clock, 60, 0).with_use_count(u32::MAX);

        holder.increment_use_count();
        assert_eq!(holder.use_count(), 0);
        holder.increment_use_count();
        assert_eq!(holder.use_count(), 1);
    }

    #[test]
    fn test_random_expiry_sub_second_is_noop() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);
        let mut rng = StdRng::seed_from_u64(3);

        holder.set_random_expiry_within(Duration::from_millis(900), &mut rng);
        assert_eq!(holder.max_cache_time(), 0);
    }

    #[test]
    fn test_use_count() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        assert_eq!(holder.use_count(), 0);
        holder.increment_use_count();
        holder.increment_use_count();
        assert_eq!(holder.use_count(), 2);
    }

    #[test]
    fn test_get_does_not_touch_use_count() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        clock.advance_secs(3);
        holder.get(&clock).unwrap();

        assert_eq!(holder.use_count(), 0);
        assert_eq!(holder.last_access_time(&clock), T0 + 3_000);
        assert_eq!(holder.creation_time(&clock), T0);
    }

    #[test]
    fn test_peek_does_not_touch_access_time() {
        let clock = clock();
        let holder = holder(&clock, 60, 0);

        clock.advance_secs(3);
        holder.peek().unwrap();

        assert_eq!(holder.last_access_time(&clock), T0);
    }

    #[test]
    fn test_holder_stays_compact() {
        assert!(std::mem::size_of::<EntryHolder<String>>() <= 40);
    }

    #[test]
    fn test_write_mode_from_str() {
        assert_eq!("identity".parse::<WriteMode>().unwrap(), WriteMode::Identity);
        assert_eq!(" Serialize ".parse::<WriteMode>().unwrap(), WriteMode::Serialize);
        assert_eq!("INTERN".parse::<WriteMode>().unwrap(), WriteMode::Intern);
        assert!("copy".parse::<WriteMode>().is_err());
    }
}

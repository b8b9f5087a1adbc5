//! Cache Module
//!
//! Per-entry holders with idle and absolute TTLs, their collaborators (clock,
//! codec, expiry policy) and a keyed store that owns them.

mod clock;
mod codec;
mod expiry;
mod holder;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock, OFFSET_SPAN_MILLIS};
pub use codec::{Codec, JsonCodec, NoCodec};
pub use expiry::{ExpiryPolicy, FixedExpiryPolicy, IdleExpiry};
pub use holder::{limit_to_positive_int, EntryHolder, SerializationMode, WriteMode};
pub use stats::{CacheStats, StatsSnapshot};
pub use store::EntryStore;

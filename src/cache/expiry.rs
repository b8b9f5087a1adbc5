//! Expiry Policy Module
//!
//! Idle-time decisions made by the owning cache at creation and update time.

// == Idle Expiry ==
/// Idle TTL requested by a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleExpiry {
    /// Keep the idle TTL of the holder being replaced
    NoChange,
    /// Idle TTL in seconds; `0` expires immediately
    Seconds(i32),
}

// == Expiry Policy Trait ==
/// Queried only when a holder is created or replaces an existing one.
pub trait ExpiryPolicy: Send + Sync {
    fn expiry_for_creation(&self) -> IdleExpiry;

    fn expiry_for_update(&self) -> IdleExpiry;
}

// == Fixed Expiry Policy ==
/// Policy returning the same decision for every creation and every update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedExpiryPolicy {
    pub on_creation: IdleExpiry,
    pub on_update: IdleExpiry,
}

impl FixedExpiryPolicy {
    /// Idle TTL assigned on creation, left unchanged on update.
    pub fn created(idle_secs: i32) -> Self {
        Self {
            on_creation: IdleExpiry::Seconds(idle_secs),
            on_update: IdleExpiry::NoChange,
        }
    }

    /// Idle TTL assigned on both creation and update.
    pub fn modified(idle_secs: i32) -> Self {
        Self {
            on_creation: IdleExpiry::Seconds(idle_secs),
            on_update: IdleExpiry::Seconds(idle_secs),
        }
    }
}

impl ExpiryPolicy for FixedExpiryPolicy {
    fn expiry_for_creation(&self) -> IdleExpiry {
        self.on_creation
    }

    fn expiry_for_update(&self) -> IdleExpiry {
        self.on_update
    }
}

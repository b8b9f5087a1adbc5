//! Error types for the entry holder and store
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::cache::WriteMode;

// == Codec Error ==
/// Failure raised by a [`Codec`](crate::cache::Codec) while encoding or decoding a value.
#[derive(Error, Debug)]
pub enum CodecError {
    /// JSON encoding or decoding failed
    #[error("json codec failure: {0}")]
    Json(#[from] serde_json::Error),

    /// The value type has no serialized form
    #[error("value type is not serializable")]
    NotSerializable,
}

// == Holder Error ==
/// Operation-scoped failures of a single holder call.
///
/// Neither variant corrupts holder state: a failed `peek` leaves the payload in place.
#[derive(Error, Debug)]
pub enum HolderError {
    /// Encoding or decoding the stored value failed
    #[error("cannot convert cache value for write mode {mode:?}")]
    Storage {
        mode: WriteMode,
        #[source]
        source: CodecError,
    },

    /// The requested write mode is declared but not implemented
    #[error("write mode not supported: {0:?}")]
    UnsupportedMode(WriteMode),
}

// == Store Error ==
/// Error type for keyed store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Key not found in store
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Holder exists but is no longer valid
    #[error("Key expired: {0}")]
    Expired(String),

    /// Holder construction or decoding failed
    #[error(transparent)]
    Holder(#[from] HolderError),
}

// == Parse Mode Error ==
/// Unknown write mode name in configuration.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown write mode: {0}")]
pub struct ParseModeError(pub String);

// == Result Type Alias ==
/// Convenience Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_storage_error_keeps_source() {
        let err = HolderError::Storage {
            mode: WriteMode::Serialize,
            source: CodecError::NotSerializable,
        };

        assert!(err.to_string().contains("Serialize"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_store_error_wraps_holder_error() {
        let err: StoreError = HolderError::UnsupportedMode(WriteMode::Intern).into();
        assert!(matches!(err, StoreError::Holder(HolderError::UnsupportedMode(_))));
        assert_eq!(err.to_string(), "write mode not supported: Intern");
    }
}

//! Codec Module
//!
//! Converts values to and from the byte form kept by serialized holders.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CodecError;

// == Codec Trait ==
/// Encodes values for holders created with [`WriteMode::Serialize`](super::WriteMode).
pub trait Codec<V> {
    /// Whether this codec can produce a serialized form at all.
    const SERIALIZABLE: bool = true;

    fn encode(value: &V) -> Result<Box<[u8]>, CodecError>;

    fn decode(bytes: &[u8]) -> Result<V, CodecError>;
}

// == JSON Codec ==
/// serde_json backed codec for any `Serialize + DeserializeOwned` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<V> Codec<V> for JsonCodec
where
    V: Serialize + DeserializeOwned,
{
    fn encode(value: &V) -> Result<Box<[u8]>, CodecError> {
        Ok(serde_json::to_vec(value)?.into_boxed_slice())
    }

    fn decode(bytes: &[u8]) -> Result<V, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

// == No Codec ==
/// Codec for value types without a serialized form. Holders using it only accept
/// [`WriteMode::Identity`](super::WriteMode).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCodec;

impl<V> Codec<V> for NoCodec {
    const SERIALIZABLE: bool = false;

    fn encode(_value: &V) -> Result<Box<[u8]>, CodecError> {
        Err(CodecError::NotSerializable)
    }

    fn decode(_bytes: &[u8]) -> Result<V, CodecError> {
        Err(CodecError::NotSerializable)
    }
}

//! The [`Record`] payload codec.
//!
//! The store moves bytes; it never interprets the payload schema. Any
//! `serde`-serializable type is a record: the blanket implementation
//! encodes with bincode, which gives a stable, compact binary form.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// A storable payload with a stable binary encoding.
///
/// Blanket-implemented for every `Serialize + DeserializeOwned` type;
/// there is normally no reason to implement it by hand.
pub trait Record: Serialize + DeserializeOwned {
    /// Encode this record to bytes.
    fn to_bytes(&self) -> StoreResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Decode a record from bytes.
    fn from_bytes(bytes: &[u8]) -> StoreResult<Self> {
        bincode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

impl<T> Record for T where T: Serialize + DeserializeOwned {}

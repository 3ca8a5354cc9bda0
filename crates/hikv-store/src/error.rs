//! Error types for store operations.
//!
//! Collaborator failures are wrapped, never translated: a
//! [`ClientError::NotFound`] from the file store stays observable through
//! [`StoreError::is_not_found`], since callers depend on distinguishing
//! a missing record from other I/O failures.

use hikv_client::ClientError;
use hikv_index::IndexError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `add` was called on a store constructed without a payload.
    #[error("store has no payload to write")]
    MissingPayload,

    /// Payload encode/decode failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Index construction or path parse failure.
    #[error("index error: {0}")]
    Index(#[from] IndexError),

    /// Failure propagated from the file-store client.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

impl StoreError {
    /// Returns `true` if the underlying cause is a missing path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Client(err) if err.is_not_found())
    }
}

/// Convenience alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

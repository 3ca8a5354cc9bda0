//! Error types for file-store client operations.

use thiserror::Error;

/// Errors that can occur during file-store operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The requested path does not exist.
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// Attempted to delete a directory that still has entries.
    #[error("directory not empty: {path}")]
    NotEmpty { path: String },

    /// Attempted to read a directory as a file.
    #[error("path is a directory: {path}")]
    IsDirectory { path: String },

    /// The path is malformed (empty, or contains an empty component).
    #[error("invalid path: {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (lock poisoning, RPC errors, ...).
    #[error("backend error: {0}")]
    Backend(String),
}

impl ClientError {
    /// Returns `true` if this error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

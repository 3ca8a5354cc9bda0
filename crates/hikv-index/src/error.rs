//! Error types for index construction and path parsing.

use thiserror::Error;

/// Errors that can occur while building or parsing an [`Index`].
///
/// [`Index`]: crate::Index
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A path could not be parsed back into an index.
    #[error("malformed path {path:?}: token {token:?}: {reason}")]
    Parse {
        path: String,
        token: String,
        reason: String,
    },

    /// A prefix, key, or value contains a character reserved by the path
    /// grammar.
    #[error("reserved character {ch:?} in {field} {value:?}")]
    ReservedCharacter {
        field: &'static str,
        value: String,
        ch: char,
    },

    /// A tag key is empty.
    #[error("tag key must not be empty (value {value:?})")]
    EmptyKey { value: String },

    /// An index level without a prefix must carry at least one tag.
    #[error("index level must carry at least one tag")]
    EmptySegment,

    /// Only the outermost index level may carry a prefix.
    #[error("subindex must not carry a prefix: {prefix:?}")]
    NestedPrefix { prefix: String },
}

/// Convenience alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

//! The [`FileStore`] trait defining the path-addressed storage interface.
//!
//! Any backend (in-memory, local filesystem, IPFS MFS) implements this
//! trait to provide file storage for hikv. All operations are synchronous
//! and may block on network or disk I/O for their duration.

use crate::error::ClientResult;

/// Whether a directory entry is a file or a directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A leaf entry holding bytes.
    File,
    /// A directory that may hold further entries.
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// One entry of a directory listing: the child's name (a single path
/// component, not a full path) and its kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Metadata for a stored path, as returned by [`FileStore::stat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    /// Content size in bytes; zero for directories.
    pub size: u64,
}

/// Path-addressed file store.
///
/// All implementations must satisfy these invariants:
/// - Writes create intermediate directories implicitly and overwrite
///   existing content at the same path (last writer wins).
/// - A read of a missing path fails with [`NotFound`], distinguishable
///   from every other error.
/// - Listing an empty or missing directory yields an empty `Vec`, not an
///   error.
/// - No operation retries, caches, or recovers internally; all failures
///   are propagated.
/// - Concurrent operations on the same path are not coordinated by the
///   store beyond whatever the backend itself guarantees.
///
/// [`NotFound`]: crate::ClientError::NotFound
pub trait FileStore: Send + Sync {
    /// Write `data` at `path`, creating parent directories as needed.
    ///
    /// Overwrites any existing file at the same path.
    fn write(&self, path: &str, data: &[u8]) -> ClientResult<()>;

    /// Read the bytes stored at `path`.
    ///
    /// Returns [`NotFound`] if nothing exists at the path.
    ///
    /// [`NotFound`]: crate::ClientError::NotFound
    fn read(&self, path: &str) -> ClientResult<Vec<u8>>;

    /// List the entries directly under `path` (one level, not recursive).
    ///
    /// Pass `""` to list the store root. An empty or missing directory
    /// yields an empty `Vec`.
    fn list(&self, path: &str) -> ClientResult<Vec<DirEntry>>;

    /// Delete the file or *empty* directory at `path`.
    ///
    /// Returns [`NotFound`] if the path does not exist and
    /// [`NotEmpty`] if it is a directory with entries.
    ///
    /// [`NotFound`]: crate::ClientError::NotFound
    /// [`NotEmpty`]: crate::ClientError::NotEmpty
    fn delete(&self, path: &str) -> ClientResult<()>;

    /// Look up metadata for `path`.
    ///
    /// Returns `Ok(None)` if the path does not exist.
    fn stat(&self, path: &str) -> ClientResult<Option<FileStat>>;

    /// Check whether anything exists at `path`.
    fn exists(&self, path: &str) -> ClientResult<bool> {
        Ok(self.stat(path)?.is_some())
    }
}

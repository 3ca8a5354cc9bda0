//! File-store client contract for hikv.
//!
//! This crate defines the narrow interface hikv expects from a
//! path-addressed file store (an IPFS MFS-style backend, a local
//! filesystem, or anything else that can write, read, list and delete by
//! path). The higher layers never talk to a concrete backend directly --
//! they hold an `Arc<dyn FileStore>` and go through this trait.
//!
//! # Contract
//!
//! - Paths are `/`-separated, relative to the store root, with no leading
//!   or trailing slash.
//! - [`FileStore::write`] creates intermediate directories implicitly.
//! - [`FileStore::read`] of a missing path is [`ClientError::NotFound`],
//!   distinguishable from every other failure.
//! - [`FileStore::list`] of an empty or missing directory returns an empty
//!   `Vec`, never an error.
//! - No operation retries or recovers internally; every backend failure is
//!   propagated to the caller.
//!
//! # Backends
//!
//! - [`InMemoryFileStore`] -- `BTreeMap`-based store for tests and embedding.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{ClientError, ClientResult};
pub use memory::InMemoryFileStore;
pub use traits::{DirEntry, EntryKind, FileStat, FileStore};

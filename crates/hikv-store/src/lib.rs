//! Record storage for hikv.
//!
//! A [`Store`] binds an [`Index`] (the record's hierarchical key) to a
//! serialized payload and a shared [`FileStore`] handle, and translates
//! between index chains and the file store's flat path space:
//!
//! - [`Store::add`] -- encode the payload and write it at the index's path
//! - [`Store::read`] -- read the path and decode into the payload slot
//! - [`Store::delete`] -- remove the file, optionally sweeping now-empty
//!   ancestor directories
//! - [`Store::query`] -- enumerate a prefix, parse each filename back into
//!   an index, and yield a store per subset-match
//! - [`Store::to_table`] -- flatten a batch of stores into a tabular view
//!
//! # Consistency
//!
//! This layer adds nothing on top of the backing store: no transactions,
//! no retries, no locking, no cross-call atomicity. Concurrent writers to
//! the same path are last-writer-wins, and a query is not a snapshot --
//! entries may appear or vanish between the listing and each per-match
//! read.
//!
//! [`Index`]: hikv_index::Index
//! [`FileStore`]: hikv_client::FileStore

pub mod error;
pub mod query;
pub mod record;
pub mod store;
pub mod table;

pub use error::{StoreError, StoreResult};
pub use query::Query;
pub use record::Record;
pub use store::{delete_if_empty, Store, Sweep};
pub use table::{FieldExtractor, Table};

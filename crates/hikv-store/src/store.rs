//! The [`Store`] binding an index to a payload and a file-store handle.
//!
//! A store is cheap to construct and stateless beyond its three fields;
//! build one per operation, or reuse a reader across read-then-inspect.
//! Every operation is a single synchronous call (or a short sequence of
//! calls, for the delete sweep) against the shared [`FileStore`] handle.

use std::sync::Arc;

use hikv_client::FileStore;
use hikv_index::Index;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::record::Record;

/// A record bound to its hierarchical key and a file-store handle.
///
/// The payload slot is `Some` for writers (construct with
/// [`Store::writer`]) and is populated on [`Store::read`] for readers
/// (construct with [`Store::reader`]).
pub struct Store<R: Record> {
    index: Index,
    payload: Option<R>,
    files: Arc<dyn FileStore>,
}

impl<R: Record> Store<R> {
    /// Construct a writer: a store carrying a payload to be added.
    pub fn writer(index: Index, payload: R, files: Arc<dyn FileStore>) -> Self {
        Self {
            index,
            payload: Some(payload),
            files,
        }
    }

    /// Construct a reader: a store whose payload is filled by [`read`].
    ///
    /// [`read`]: Store::read
    pub fn reader(index: Index, files: Arc<dyn FileStore>) -> Self {
        Self {
            index,
            payload: None,
            files,
        }
    }

    /// The record's hierarchical key.
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// The payload, if this store carries one.
    pub fn payload(&self) -> Option<&R> {
        self.payload.as_ref()
    }

    /// Consume the store, returning the payload.
    pub fn into_payload(self) -> Option<R> {
        self.payload
    }

    /// Encode the payload and write it at the index's path.
    ///
    /// Overwrites any existing record at the same key. Fails with
    /// [`StoreError::MissingPayload`] on a store constructed without a
    /// payload; collaborator failures propagate unretried.
    pub fn add(&self) -> StoreResult<()> {
        let payload = self.payload.as_ref().ok_or(StoreError::MissingPayload)?;
        let bytes = payload.to_bytes()?;
        let path = self.index.to_path();
        debug!(%path, size = bytes.len(), "adding record");
        self.files.write(&path, &bytes)?;
        Ok(())
    }

    /// Read the bytes at the index's path and decode them into the
    /// payload slot, returning a reference to the decoded record.
    ///
    /// A missing record surfaces the client's not-found error verbatim;
    /// check [`StoreError::is_not_found`].
    pub fn read(&mut self) -> StoreResult<&R> {
        let path = self.index.to_path();
        debug!(%path, "reading record");
        let bytes = self.files.read(&path)?;
        let record = R::from_bytes(&bytes)?;
        Ok(self.payload.insert(record))
    }

    /// Delete the record at the index's path.
    ///
    /// With `check_directory` set, additionally sweep upward: delete each
    /// now-empty ancestor directory, stopping at the first ancestor that
    /// still has entries or at the store root. The sweep and any
    /// concurrent add are not atomic as a pair; a racing writer can
    /// recreate a directory this walk has just examined.
    pub fn delete(&self, check_directory: bool) -> StoreResult<()> {
        let path = self.index.to_path();
        debug!(%path, check_directory, "deleting record");
        self.files.delete(&path)?;

        if check_directory {
            let mut current = parent(&path);
            while let Some(directory) = current {
                match delete_if_empty(self.files.as_ref(), &directory)? {
                    Sweep::Stop => break,
                    Sweep::Continue => current = parent(&directory),
                }
            }
        }
        Ok(())
    }
}

impl<R: Record> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("index", &self.index.to_path())
            .field("has_payload", &self.payload.is_some())
            .finish()
    }
}

/// Outcome of one step of the ancestor sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sweep {
    /// The directory was empty and has been deleted; keep walking upward.
    Continue,
    /// The directory still has entries; the walk ends here.
    Stop,
}

/// Delete `directory` if it has no entries.
///
/// This is the single unit the ancestor sweep repeats, public so the walk
/// can be exercised one step at a time.
pub fn delete_if_empty(files: &dyn FileStore, directory: &str) -> StoreResult<Sweep> {
    if files.list(directory)?.is_empty() {
        debug!(%directory, "deleting empty directory");
        files.delete(directory)?;
        Ok(Sweep::Continue)
    } else {
        Ok(Sweep::Stop)
    }
}

/// Parent of a rendered path, segment by segment.
///
/// Index segments can contain `.`-joined tags, so the parent must come
/// from splitting on the level separator, never from prefix trimming.
fn parent(path: &str) -> Option<String> {
    path.rsplit_once('/').map(|(dir, _)| dir.to_string())
}

#[cfg(test)]
mod tests {
    use hikv_client::InMemoryFileStore;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        body: String,
        rev: u32,
    }

    fn note() -> Note {
        Note {
            body: "fizz".into(),
            rev: 1,
        }
    }

    fn three_level_index(created: &str) -> Index {
        Index::with_prefix("test", [("testindex1", "id1"), ("testindex2", "id2")])
            .unwrap()
            .nest(Index::new([("loan", "abc")]).unwrap())
            .unwrap()
            .nest(Index::new([("created", created)]).unwrap())
            .unwrap()
    }

    // -----------------------------------------------------------------------
    // Add / read
    // -----------------------------------------------------------------------

    #[test]
    fn add_then_read() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = three_level_index("t1");

        Store::writer(index.clone(), note(), Arc::clone(&files))
            .add()
            .unwrap();

        let mut reader: Store<Note> = Store::reader(index, Arc::clone(&files));
        assert_eq!(reader.read().unwrap(), &note());
        assert_eq!(reader.payload(), Some(&note()));
    }

    #[test]
    fn add_without_payload_fails_fast() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let reader: Store<Note> = Store::reader(three_level_index("t1"), files);
        assert!(matches!(
            reader.add().unwrap_err(),
            StoreError::MissingPayload
        ));
    }

    #[test]
    fn read_missing_record_is_not_found() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let mut reader: Store<Note> = Store::reader(three_level_index("t1"), files);
        assert!(reader.read().unwrap_err().is_not_found());
    }

    #[test]
    fn add_overwrites() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = three_level_index("t1");

        Store::writer(index.clone(), note(), Arc::clone(&files))
            .add()
            .unwrap();
        let updated = Note {
            body: "buzz".into(),
            rev: 2,
        };
        Store::writer(index.clone(), updated.clone(), Arc::clone(&files))
            .add()
            .unwrap();

        let mut reader: Store<Note> = Store::reader(index, files);
        assert_eq!(reader.read().unwrap(), &updated);
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_then_read_is_not_found() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = three_level_index("t1");

        let writer = Store::writer(index.clone(), note(), Arc::clone(&files));
        writer.add().unwrap();
        writer.delete(false).unwrap();

        let mut reader: Store<Note> = Store::reader(index, files);
        assert!(reader.read().unwrap_err().is_not_found());
    }

    #[test]
    fn delete_without_sweep_leaves_directories() {
        let store = InMemoryFileStore::new();
        let files: Arc<dyn FileStore> = Arc::new(store);
        let index = three_level_index("t1");

        let writer = Store::writer(index, note(), Arc::clone(&files));
        writer.add().unwrap();
        writer.delete(false).unwrap();

        assert!(files.exists("test/testindex1_id1.testindex2_id2").unwrap());
    }

    #[test]
    fn delete_with_sweep_removes_empty_ancestors() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = three_level_index("t1");

        let writer = Store::writer(index, note(), Arc::clone(&files));
        writer.add().unwrap();
        writer.delete(true).unwrap();

        // The whole branch is gone, including the prefix directory.
        assert!(!files
            .exists("test/testindex1_id1.testindex2_id2/loan_abc")
            .unwrap());
        assert!(!files.exists("test/testindex1_id1.testindex2_id2").unwrap());
        assert!(!files.exists("test").unwrap());
    }

    #[test]
    fn delete_sweep_stops_at_first_non_empty_ancestor() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());

        // Two leaves sharing the prefix directory but not the tag branch.
        let doomed = three_level_index("t1");
        let survivor = Index::with_prefix("test", [("other", "x")]).unwrap();

        Store::writer(doomed.clone(), note(), Arc::clone(&files))
            .add()
            .unwrap();
        Store::writer(survivor.clone(), note(), Arc::clone(&files))
            .add()
            .unwrap();

        Store::writer(doomed, note(), Arc::clone(&files))
            .delete(true)
            .unwrap();

        // The doomed branch is swept, the shared prefix directory stays.
        assert!(!files.exists("test/testindex1_id1.testindex2_id2").unwrap());
        assert!(files.exists("test").unwrap());
        assert!(files.exists(&survivor.to_path()).unwrap());
    }

    #[test]
    fn delete_missing_record_is_not_found() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let writer = Store::writer(three_level_index("t1"), note(), files);
        assert!(writer.delete(false).unwrap_err().is_not_found());
    }

    // -----------------------------------------------------------------------
    // delete_if_empty
    // -----------------------------------------------------------------------

    #[test]
    fn delete_if_empty_deletes_and_continues() {
        let store = InMemoryFileStore::new();
        store.write("dir/file", b"x").unwrap();
        store.delete("dir/file").unwrap();

        assert_eq!(delete_if_empty(&store, "dir").unwrap(), Sweep::Continue);
        assert!(store.stat("dir").unwrap().is_none());
    }

    #[test]
    fn delete_if_empty_stops_on_non_empty() {
        let store = InMemoryFileStore::new();
        store.write("dir/file", b"x").unwrap();

        assert_eq!(delete_if_empty(&store, "dir").unwrap(), Sweep::Stop);
        assert!(store.stat("dir").unwrap().is_some());
        assert!(store.stat("dir/file").unwrap().is_some());
    }
}

//! In-memory file store for testing and ephemeral use.
//!
//! [`InMemoryFileStore`] keeps every file and directory in a `BTreeMap`
//! protected by a `RwLock`. It implements the full [`FileStore`] trait and
//! is suitable for unit tests, examples, and short-lived processes. Data is
//! lost when the store is dropped.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::traits::{DirEntry, EntryKind, FileStat, FileStore};

/// One node in the store: a file with owned bytes, or a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Node {
    File(Vec<u8>),
    Directory,
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory => EntryKind::Directory,
        }
    }
}

/// An in-memory implementation of [`FileStore`].
///
/// All data lives in a `BTreeMap` behind a `RwLock`; the sorted map keeps
/// listings in lexicographic order. Directories are materialized explicitly
/// when a file is written beneath them, mirroring MFS-style backends where
/// a directory exists (and can be empty) independently of its files.
pub struct InMemoryFileStore {
    nodes: RwLock<BTreeMap<String, Node>>,
}

impl InMemoryFileStore {
    /// Create a new empty file store.
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of files currently stored (directories not counted).
    pub fn len(&self) -> usize {
        self.nodes
            .read()
            .map(|m| m.values().filter(|n| matches!(n, Node::File(_))).count())
            .unwrap_or(0)
    }

    /// Returns `true` if the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove everything from the store.
    pub fn clear(&self) {
        if let Ok(mut map) = self.nodes.write() {
            map.clear();
        }
    }

    /// All file paths currently stored, in lexicographic order.
    pub fn paths(&self) -> Vec<String> {
        self.nodes
            .read()
            .map(|m| {
                m.iter()
                    .filter(|(_, n)| matches!(n, Node::File(_)))
                    .map(|(p, _)| p.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn read_lock(&self) -> ClientResult<std::sync::RwLockReadGuard<'_, BTreeMap<String, Node>>> {
        self.nodes
            .read()
            .map_err(|e| ClientError::Backend(format!("lock poisoned: {e}")))
    }

    fn write_lock(&self) -> ClientResult<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Node>>> {
        self.nodes
            .write()
            .map_err(|e| ClientError::Backend(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryFileStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a path: strip leading/trailing slashes, reject empty
/// components. Returns the normalized path ("" denotes the store root).
fn normalize(path: &str) -> ClientResult<String> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if trimmed.split('/').any(str::is_empty) {
        return Err(ClientError::InvalidPath {
            path: path.to_string(),
            reason: "empty path component".into(),
        });
    }
    Ok(trimmed.to_string())
}

/// Normalize and reject the root (for operations that need a real path).
fn normalize_non_root(path: &str) -> ClientResult<String> {
    let norm = normalize(path)?;
    if norm.is_empty() {
        return Err(ClientError::InvalidPath {
            path: path.to_string(),
            reason: "path must not be the store root".into(),
        });
    }
    Ok(norm)
}

impl FileStore for InMemoryFileStore {
    fn write(&self, path: &str, data: &[u8]) -> ClientResult<()> {
        let path = normalize_non_root(path)?;
        let mut map = self.write_lock()?;

        if matches!(map.get(&path), Some(Node::Directory)) {
            return Err(ClientError::IsDirectory { path });
        }

        // Materialize ancestor directories. An ancestor that exists as a
        // file makes the path unreachable.
        let mut ancestor = path.as_str();
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            match map.get(parent) {
                Some(Node::File(_)) => {
                    return Err(ClientError::InvalidPath {
                        path: path.clone(),
                        reason: format!("ancestor is a file: {parent}"),
                    });
                }
                Some(Node::Directory) => {}
                None => {
                    map.insert(parent.to_string(), Node::Directory);
                }
            }
            ancestor = parent;
        }

        map.insert(path, Node::File(data.to_vec()));
        Ok(())
    }

    fn read(&self, path: &str) -> ClientResult<Vec<u8>> {
        let path = normalize_non_root(path)?;
        let map = self.read_lock()?;
        match map.get(&path) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Directory) => Err(ClientError::IsDirectory { path }),
            None => Err(ClientError::NotFound { path }),
        }
    }

    fn list(&self, path: &str) -> ClientResult<Vec<DirEntry>> {
        let path = normalize(path)?;
        let map = self.read_lock()?;

        let prefix = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };

        let mut entries: Vec<DirEntry> = Vec::new();
        for (key, node) in map.range(prefix.clone()..) {
            if !key.starts_with(&prefix) {
                break;
            }
            let rest = &key[prefix.len()..];
            // Direct children only: no further slash in the remainder.
            if rest.is_empty() || rest.contains('/') {
                continue;
            }
            entries.push(DirEntry::new(rest, node.kind()));
        }
        Ok(entries)
    }

    fn delete(&self, path: &str) -> ClientResult<()> {
        let path = normalize_non_root(path)?;
        let mut map = self.write_lock()?;
        match map.get(&path) {
            Some(Node::File(_)) => {
                map.remove(&path);
                Ok(())
            }
            Some(Node::Directory) => {
                let child_prefix = format!("{path}/");
                if map.range(child_prefix.clone()..).next().is_some_and(|(k, _)| {
                    k.starts_with(&child_prefix)
                }) {
                    return Err(ClientError::NotEmpty { path });
                }
                map.remove(&path);
                Ok(())
            }
            None => Err(ClientError::NotFound { path }),
        }
    }

    fn stat(&self, path: &str) -> ClientResult<Option<FileStat>> {
        let path = normalize(path)?;
        if path.is_empty() {
            return Ok(Some(FileStat {
                kind: EntryKind::Directory,
                size: 0,
            }));
        }
        let map = self.read_lock()?;
        Ok(map.get(&path).map(|node| match node {
            Node::File(data) => FileStat {
                kind: EntryKind::File,
                size: data.len() as u64,
            },
            Node::Directory => FileStat {
                kind: EntryKind::Directory,
                size: 0,
            },
        }))
    }
}

impl std::fmt::Debug for InMemoryFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryFileStore")
            .field("file_count", &self.len())
            .finish()
    }
}

//! Prefix queries: enumerate stored paths, parse them back into indexes,
//! and yield a [`Store`] per subset-match.
//!
//! The listing is eager (one recursive walk when the query is built); the
//! per-match read is lazy, one file-store call per yielded item. A query
//! is not a snapshot: entries may appear or vanish between the walk and
//! each read.

use std::marker::PhantomData;
use std::sync::Arc;

use hikv_client::{ClientResult, EntryKind, FileStore};
use hikv_index::Index;
use tracing::debug;

use crate::error::StoreResult;
use crate::record::Record;
use crate::store::Store;

impl<R: Record> Store<R> {
    /// Query for records whose index subset-matches `query`.
    ///
    /// The walk starts at the query's prefix component (the store root
    /// when no prefix is set) and enumerates files up to
    /// `query.depth() + size` segments deep, where `size` is the query's
    /// enumeration hint; without a hint the walk is unbounded. Each
    /// enumerated path is parsed back into an index and kept iff
    /// [`Index::matches`] holds.
    ///
    /// The returned iterator yields one `StoreResult` per candidate:
    /// a single item's parse or read failure is reported in place and the
    /// iteration continues. Collect into `Result<Vec<_>, _>` to abort on
    /// the first failure instead. Ordering follows the backing store's
    /// listing order.
    pub fn query(query: Index, files: Arc<dyn FileStore>) -> StoreResult<Query<R>> {
        let root = query.prefix().unwrap_or_default().to_string();
        let max_segments = query.size().map(|size| query.depth() + size);

        let mut candidates = Vec::new();
        walk(files.as_ref(), &root, 0, max_segments, &mut candidates)?;
        debug!(
            query = %query.to_path(),
            candidates = candidates.len(),
            "query listing complete"
        );

        Ok(Query {
            query,
            files,
            candidates: candidates.into_iter(),
            _record: PhantomData,
        })
    }
}

/// Collect file paths under `directory`, depth-first in listing order.
///
/// `depth` counts segments below the walk root; a directory is entered
/// only while its children stay within `max_segments`.
fn walk(
    files: &dyn FileStore,
    directory: &str,
    depth: usize,
    max_segments: Option<usize>,
    out: &mut Vec<String>,
) -> ClientResult<()> {
    for entry in files.list(directory)? {
        let path = if directory.is_empty() {
            entry.name.clone()
        } else {
            format!("{directory}/{}", entry.name)
        };
        match entry.kind {
            EntryKind::File => {
                if max_segments.map_or(true, |limit| depth + 1 <= limit) {
                    out.push(path);
                }
            }
            EntryKind::Directory => {
                if max_segments.map_or(true, |limit| depth + 1 < limit) {
                    walk(files, &path, depth + 1, max_segments, out)?;
                }
            }
        }
    }
    Ok(())
}

/// Lazy sequence of query results.
///
/// Produced by [`Store::query`]; each `next` parses one enumerated path,
/// filters it against the query index, and reads the matched record.
pub struct Query<R: Record> {
    query: Index,
    files: Arc<dyn FileStore>,
    candidates: std::vec::IntoIter<String>,
    _record: PhantomData<R>,
}

impl<R: Record> Iterator for Query<R> {
    type Item = StoreResult<Store<R>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = self.candidates.next()?;
            let candidate = match Index::from_path(&path) {
                Ok(index) => index,
                Err(err) => return Some(Err(err.into())),
            };
            if !self.query.matches(&candidate) {
                continue;
            }
            let mut store = Store::reader(candidate, Arc::clone(&self.files));
            if let Some(err) = store.read().err() {
                return Some(Err(err));
            }
            return Some(Ok(store));
        }
    }
}

impl<R: Record> std::fmt::Debug for Query<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("query", &self.query.to_path())
            .field("remaining_candidates", &self.candidates.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use hikv_client::InMemoryFileStore;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use super::*;
    use crate::error::StoreError;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Payment {
        amount: u64,
        memo: String,
    }

    fn payment() -> Payment {
        Payment {
            amount: 250,
            memo: "first installment".into(),
        }
    }

    fn loan_index(borrower: &str, lender: &str, loan: &str) -> Index {
        Index::with_prefix("loan", [("borrower", borrower), ("lender", lender)])
            .unwrap()
            .nest(Index::new([("loan", loan)]).unwrap())
            .unwrap()
    }

    fn add_payment(files: &Arc<dyn FileStore>, index: &Index, data: &Payment) {
        Store::writer(index.clone(), data.clone(), Arc::clone(files))
            .add()
            .unwrap();
    }

    #[test]
    fn query_by_borrower_and_lender() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let borrower = Uuid::now_v7().to_string();
        let lender = Uuid::now_v7().to_string();
        let index = loan_index(&borrower, &lender, &Uuid::now_v7().to_string());
        add_payment(&files, &index, &payment());

        let query =
            Index::with_prefix("loan", [("borrower", borrower.as_str()), ("lender", lender.as_str())])
                .unwrap();
        let results: Vec<Store<Payment>> = Store::query(query, files)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index(), &index);
        assert_eq!(results[0].payload(), Some(&payment()));
    }

    #[test]
    fn query_by_borrower_only() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let borrower = Uuid::now_v7().to_string();
        let index = loan_index(
            &borrower,
            &Uuid::now_v7().to_string(),
            &Uuid::now_v7().to_string(),
        );
        add_payment(&files, &index, &payment());

        // A stranger's loan that must not match.
        let other = loan_index(
            &Uuid::now_v7().to_string(),
            &Uuid::now_v7().to_string(),
            &Uuid::now_v7().to_string(),
        );
        add_payment(&files, &other, &payment());

        let query = Index::with_prefix("loan", [("borrower", borrower.as_str())]).unwrap();
        let results: Vec<Store<Payment>> = Store::query(query, files)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].index(), &index);
    }

    #[test]
    fn query_with_no_match_is_empty() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = loan_index("b1", "l1", "loan1");
        add_payment(&files, &index, &payment());

        let query = Index::with_prefix("loan", [("borrower", "nobody")]).unwrap();
        let results: Vec<_> = Store::<Payment>::query(query, files).unwrap().collect();
        assert!(results.is_empty());
    }

    #[test]
    fn prefix_only_query_returns_everything_under_prefix() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        add_payment(&files, &loan_index("b1", "l1", "loan1"), &payment());
        add_payment(&files, &loan_index("b2", "l2", "loan2"), &payment());

        // A record in another namespace.
        let vouch = Index::with_prefix("vouch", [("voucher", "v1")]).unwrap();
        add_payment(&files, &vouch, &payment());

        let tags: [(&str, &str); 0] = [];
        let query = Index::with_prefix("loan", tags).unwrap();
        let results: Vec<Store<Payment>> = Store::query(query, files)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn size_hint_bounds_the_walk() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = loan_index("b1", "l1", "loan1")
            .nest(Index::new([("payment", "p1")]).unwrap())
            .unwrap();
        add_payment(&files, &index, &payment());

        // Files live three segments below the prefix; the query specifies
        // one, so a budget of one more segment cannot reach them.
        let shallow = Index::with_prefix("loan", [("borrower", "b1")])
            .unwrap()
            .with_size(1);
        let results: Vec<_> = Store::<Payment>::query(shallow, Arc::clone(&files))
            .unwrap()
            .collect();
        assert!(results.is_empty());

        let deep = Index::with_prefix("loan", [("borrower", "b1")])
            .unwrap()
            .with_size(2);
        let results: Vec<Store<Payment>> = Store::query(deep, files)
            .unwrap()
            .collect::<StoreResult<_>>()
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn malformed_filename_is_reported_per_item() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let index = loan_index("b1", "l1", "loan1");
        add_payment(&files, &index, &payment());

        // A foreign file under the same prefix with no tag separator.
        files.write("loan/garbage", b"junk").unwrap();

        let tags: [(&str, &str); 0] = [];
        let query = Index::with_prefix("loan", tags).unwrap();
        let results: Vec<StoreResult<Store<Payment>>> =
            Store::query(query, files).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::Index(_)))));
    }

    #[test]
    fn corrupt_payload_is_reported_per_item() {
        let files: Arc<dyn FileStore> = Arc::new(InMemoryFileStore::new());
        let good = loan_index("b1", "l1", "loan1");
        add_payment(&files, &good, &payment());

        let bad = loan_index("b1", "l1", "loan2");
        files.write(&bad.to_path(), b"").unwrap();

        let query = Index::with_prefix("loan", [("borrower", "b1")]).unwrap();
        let results: Vec<StoreResult<Store<Payment>>> =
            Store::query(query, files).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(StoreError::Serialization(_)))));
        assert!(results.iter().any(|r| r.is_ok()));
    }
}

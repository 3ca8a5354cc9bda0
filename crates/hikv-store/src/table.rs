//! Tabular view over a batch of stores.
//!
//! [`Store::to_table`] flattens each store's index tags into columns and
//! appends one column per caller-supplied field extractor. This is a
//! reporting convenience layered on top of the CRUD path; nothing here is
//! persisted or read back.

use serde::Serialize;

use crate::record::Record;
use crate::store::Store;

/// A pure function extracting one display value from a store.
pub type FieldExtractor<R> = Box<dyn Fn(&Store<R>) -> String>;

/// A column-ordered table of string cells.
///
/// Columns are the union of flattened tag keys across all rows, in
/// first-seen order, followed by the extractor columns in the order they
/// were supplied. A row missing a tag renders an empty cell; on key
/// collisions across index levels the innermost level's value wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// The column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The rows, cell order matching [`columns`](Table::columns).
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All cells of the named column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let position = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[position].as_str()).collect())
    }
}

impl<R: Record> Store<R> {
    /// Flatten `stores` into a [`Table`].
    ///
    /// `extractors` maps an output column name to a function over the
    /// store (typically projecting a payload field); extractor columns
    /// come after the tag columns, in the supplied order.
    pub fn to_table(stores: &[Store<R>], extractors: &[(String, FieldExtractor<R>)]) -> Table {
        let mut columns: Vec<String> = Vec::new();
        let flattened: Vec<_> = stores
            .iter()
            .map(|store| store.index().flat_tags())
            .collect();

        for tags in &flattened {
            for key in tags.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let tag_columns = columns.len();
        columns.extend(extractors.iter().map(|(name, _)| name.clone()));

        let rows = stores
            .iter()
            .zip(&flattened)
            .map(|(store, tags)| {
                let mut row: Vec<String> = columns[..tag_columns]
                    .iter()
                    .map(|column| tags.get(column).cloned().unwrap_or_default())
                    .collect();
                row.extend(extractors.iter().map(|(_, extract)| extract(store)));
                row
            })
            .collect();

        Table { columns, rows }
    }
}

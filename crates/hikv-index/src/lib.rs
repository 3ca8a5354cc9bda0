//! Hierarchical record keys for hikv.
//!
//! An [`Index`] is the structured form of a record's logical key: an
//! optional namespace prefix, an insertion-ordered set of key/value tags,
//! and an optional nested subindex forming a chain of tag groups. Each
//! level of the chain renders as one `/`-separated component of a flat
//! path, so the whole key doubles as a location in a path-addressed file
//! store:
//!
//! ```text
//! loan/borrower_b123.lender_l456/loan_abc/payment_p1
//! ^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^ ^^^^^^^^^^
//! prefix    level 0 tags          level 1   level 2
//! ```
//!
//! # Key Types
//!
//! - [`Index`] -- the chained key: prefix, ordered tags, optional subindex
//! - [`IndexError`] -- construction and parse failures
//!
//! # Grammar
//!
//! ```text
//! path    := [prefix "/"] segment ("/" segment)*
//! segment := tag ("." tag)*
//! tag     := key "_" value        ; split point = FIRST underscore only
//! ```
//!
//! The first path component is the prefix iff it contains no `_`. Reserved
//! characters are rejected at construction time, so every constructible
//! index round-trips through [`Index::to_path`] / [`Index::from_path`].

pub mod error;
pub mod index;
pub mod path;

pub use error::{IndexError, IndexResult};
pub use index::Index;

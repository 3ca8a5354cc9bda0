//! The core [`Index`] structure: validated construction and subset
//! matching.
//!
//! An index is immutable once built: the tag order and the subindex chain
//! are fixed at construction, and every reserved-character rule is enforced
//! eagerly so that corruption cannot surface later at parse time.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Separator between path components (index levels).
pub const LEVEL_SEPARATOR: char = '/';
/// Separator between tags within one segment.
pub const TAG_SEPARATOR: char = '.';
/// Separator between a tag's key and value.
pub const KEY_VALUE_SEPARATOR: char = '_';

/// A structured, chainable record key.
///
/// See the [crate docs](crate) for the rendered path grammar. Equality
/// covers the prefix, the tags (keys, values, and order), the subindex
/// chain, and the `size` hint; a parsed index never carries a `size`, so
/// round-trip comparisons should be made against indexes built without
/// one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    prefix: Option<String>,
    tags: IndexMap<String, String>,
    subindex: Option<Box<Index>>,
    /// Enumeration-depth hint for queries: how many segment levels below
    /// the specified ones to descend. Opaque to the codec, never rendered.
    size: Option<usize>,
}

impl Index {
    /// Build an index level from key/value tags, in iteration order.
    ///
    /// Fails if the tags are empty or any key/value contains a reserved
    /// character.
    pub fn new<I, K, V>(tags: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tags = collect_tags(tags)?;
        if tags.is_empty() {
            return Err(IndexError::EmptySegment);
        }
        Ok(Self {
            prefix: None,
            tags,
            subindex: None,
            size: None,
        })
    }

    /// Build a prefixed index level.
    ///
    /// Empty tags are allowed here: a prefix-only index is a legitimate
    /// query ("everything in this namespace").
    pub fn with_prefix<I, K, V>(prefix: impl Into<String>, tags: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self {
            prefix: Some(prefix),
            tags: collect_tags(tags)?,
            subindex: None,
            size: None,
        })
    }

    /// Attach `sub` at the deepest level of this index's chain.
    ///
    /// The subindex must be prefix-free and must carry at least one tag,
    /// and a prefix-only (tagless) level cannot be nested under: both
    /// would render a path that parses back to a different chain.
    pub fn nest(mut self, sub: Index) -> IndexResult<Self> {
        if let Some(prefix) = &sub.prefix {
            return Err(IndexError::NestedPrefix {
                prefix: prefix.clone(),
            });
        }
        if sub.tags.is_empty() || self.tags.is_empty() {
            return Err(IndexError::EmptySegment);
        }
        self.attach(sub);
        Ok(self)
    }

    fn attach(&mut self, sub: Index) {
        match &mut self.subindex {
            Some(inner) => inner.attach(sub),
            None => self.subindex = Some(Box::new(sub)),
        }
    }

    /// Set the enumeration-depth hint used by queries.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// The namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The tags of this level, in insertion order.
    pub fn tags(&self) -> &IndexMap<String, String> {
        &self.tags
    }

    /// The nested index, if any.
    pub fn subindex(&self) -> Option<&Index> {
        self.subindex.as_deref()
    }

    /// The enumeration-depth hint, if set.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// Number of tag-carrying levels in the chain.
    pub fn depth(&self) -> usize {
        self.levels().filter(|level| !level.tags.is_empty()).count()
    }

    /// Iterate the chain from this level inward.
    pub fn levels(&self) -> Levels<'_> {
        Levels {
            current: Some(self),
        }
    }

    /// Merge tags across the whole chain into one mapping.
    ///
    /// On key collision the innermost level's value wins; column order is
    /// first-seen.
    pub fn flat_tags(&self) -> IndexMap<String, String> {
        let mut flat = IndexMap::new();
        for level in self.levels() {
            for (key, value) in &level.tags {
                flat.insert(key.clone(), value.clone());
            }
        }
        flat
    }

    /// Subset-match `self` (as a query) against a fully-specified
    /// `candidate`.
    ///
    /// True iff:
    /// - the query prefix is unset or equals the candidate prefix,
    /// - every query tag exists in the candidate level with an equal value
    ///   (the candidate may carry extra tags), and
    /// - a query subindex recursively matches the candidate subindex
    ///   (false if the candidate chain is shorter).
    ///
    /// A query without a subindex matches regardless of candidate depth,
    /// which is what makes "query by any prefix of the key" work.
    pub fn matches(&self, candidate: &Index) -> bool {
        if let Some(prefix) = &self.prefix {
            if candidate.prefix.as_ref() != Some(prefix) {
                return false;
            }
        }
        for (key, value) in &self.tags {
            if candidate.tags.get(key) != Some(value) {
                return false;
            }
        }
        match &self.subindex {
            Some(sub) => match &candidate.subindex {
                Some(candidate_sub) => sub.matches(candidate_sub),
                None => false,
            },
            None => true,
        }
    }

    pub(crate) fn from_parts(
        prefix: Option<String>,
        tags: IndexMap<String, String>,
        subindex: Option<Box<Index>>,
    ) -> Self {
        Self {
            prefix,
            tags,
            subindex,
            size: None,
        }
    }
}

impl std::fmt::Display for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Iterator over the levels of an index chain, outermost first.
pub struct Levels<'a> {
    current: Option<&'a Index>,
}

impl<'a> Iterator for Levels<'a> {
    type Item = &'a Index;

    fn next(&mut self) -> Option<Self::Item> {
        let level = self.current?;
        self.current = level.subindex.as_deref();
        Some(level)
    }
}

fn collect_tags<I, K, V>(tags: I) -> IndexResult<IndexMap<String, String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut map = IndexMap::new();
    for (key, value) in tags {
        let key = key.into();
        let value = value.into();
        validate_key(&key, &value)?;
        validate_value(&value)?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Tag keys must be non-empty and free of all three separators: a `/` or
/// `.` would break the segment structure, and a `_` would shift the
/// first-underscore split point.
fn validate_key(key: &str, value: &str) -> IndexResult<()> {
    if key.is_empty() {
        return Err(IndexError::EmptyKey {
            value: value.to_string(),
        });
    }
    for ch in [LEVEL_SEPARATOR, TAG_SEPARATOR, KEY_VALUE_SEPARATOR] {
        if key.contains(ch) {
            return Err(IndexError::ReservedCharacter {
                field: "tag key",
                value: key.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

/// Tag values may contain `_` (parsing splits on the first underscore
/// only) but not `/` or `.`.
fn validate_value(value: &str) -> IndexResult<()> {
    for ch in [LEVEL_SEPARATOR, TAG_SEPARATOR] {
        if value.contains(ch) {
            return Err(IndexError::ReservedCharacter {
                field: "tag value",
                value: value.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

/// A prefix renders as a bare path component and is recognized on parse by
/// containing no `_`, so it must avoid `/` and `_` (and `.` would make it
/// look like a multi-tag segment).
fn validate_prefix(prefix: &str) -> IndexResult<()> {
    if prefix.is_empty() {
        return Err(IndexError::EmptyKey {
            value: String::new(),
        });
    }
    for ch in [LEVEL_SEPARATOR, TAG_SEPARATOR, KEY_VALUE_SEPARATOR] {
        if prefix.contains(ch) {
            return Err(IndexError::ReservedCharacter {
                field: "prefix",
                value: prefix.to_string(),
                ch,
            });
        }
    }
    Ok(())
}

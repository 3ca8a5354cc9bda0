//! The path codec: rendering an [`Index`] to its flat path and parsing a
//! path back into an index chain.
//!
//! Rendering is a pure function of the index; it never touches a file
//! store. Parsing is its exact inverse for every constructible index, and
//! reports a structured [`IndexError::Parse`] for anything that violates
//! the grammar instead of silently dropping malformed tokens.

use indexmap::IndexMap;

use crate::error::{IndexError, IndexResult};
use crate::index::{Index, KEY_VALUE_SEPARATOR, LEVEL_SEPARATOR, TAG_SEPARATOR};

impl Index {
    /// Render this index to its path form.
    ///
    /// The prefix (if present) is the first component; each tag-carrying
    /// level of the chain becomes one further component, with tags joined
    /// by `.` in insertion order and each tag rendered `key_value`.
    pub fn to_path(&self) -> String {
        let mut components: Vec<String> = Vec::new();
        if let Some(prefix) = self.prefix() {
            components.push(prefix.to_string());
        }
        for level in self.levels() {
            if level.tags().is_empty() {
                continue;
            }
            let segment: Vec<String> = level
                .tags()
                .iter()
                .map(|(key, value)| format!("{key}{KEY_VALUE_SEPARATOR}{value}"))
                .collect();
            components.push(segment.join(&TAG_SEPARATOR.to_string()));
        }
        components.join(&LEVEL_SEPARATOR.to_string())
    }

    /// Parse a path back into an index chain.
    ///
    /// The first component is taken as the prefix iff it contains no `_`;
    /// every remaining component must parse as a tag segment. Each tag
    /// token is split on its *first* underscore only, so values containing
    /// underscores survive the round trip.
    pub fn from_path(path: &str) -> IndexResult<Self> {
        let components: Vec<&str> = path
            .split(LEVEL_SEPARATOR)
            .filter(|component| !component.is_empty())
            .collect();

        let (prefix, segments) = match components.split_first() {
            None => {
                return Err(IndexError::Parse {
                    path: path.to_string(),
                    token: String::new(),
                    reason: "empty path".into(),
                });
            }
            Some((first, rest)) if !first.contains(KEY_VALUE_SEPARATOR) => {
                (Some(first.to_string()), rest)
            }
            Some(_) => (None, components.as_slice()),
        };

        // Build the chain from the innermost segment outward.
        let mut chain: Option<Box<Index>> = None;
        for segment in segments.iter().rev() {
            let tags = parse_segment(path, segment)?;
            chain = Some(Box::new(Index::from_parts(None, tags, chain)));
        }

        Ok(match chain {
            Some(outer) => {
                let mut index = *outer;
                if let Some(prefix) = prefix {
                    index = Index::from_parts(
                        Some(prefix),
                        index.tags().clone(),
                        index.subindex().cloned().map(Box::new),
                    );
                }
                index
            }
            // A bare prefix parses to a prefix-only query index.
            None => Index::from_parts(prefix, IndexMap::new(), None),
        })
    }
}

fn parse_segment(path: &str, segment: &str) -> IndexResult<IndexMap<String, String>> {
    let mut tags = IndexMap::new();
    for token in segment.split(TAG_SEPARATOR) {
        let Some((key, value)) = token.split_once(KEY_VALUE_SEPARATOR) else {
            return Err(IndexError::Parse {
                path: path.to_string(),
                token: token.to_string(),
                reason: "tag token has no key/value separator".into(),
            });
        };
        if key.is_empty() {
            return Err(IndexError::Parse {
                path: path.to_string(),
                token: token.to_string(),
                reason: "tag key is empty".into(),
            });
        }
        tags.insert(key.to_string(), value.to_string());
    }
    Ok(tags)
}

//! Read-only collections of content entries.
//!
//! A collection is parsed once from a bundled YAML document and then only
//! borrowed. Search, category filtering and id lookup are linear scans that
//! preserve source order.

use std::collections::HashSet;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Failure to load a collection document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse collection '{collection}': {source}")]
    Parse {
        collection: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Collection document names '{found}' but was loaded as '{expected}'")]
    NameMismatch { expected: String, found: String },
}

/// An entry that can be searched, filtered by category and looked up by id
pub trait CatalogEntry {
    /// Classification used by `filter_by_category`
    type Category: Copy + Eq + Hash;

    /// Stable identifier
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    fn category(&self) -> Self::Category;

    /// Whether any searchable field contains `needle`.
    ///
    /// `needle` is already lowercased.
    fn matches(&self, needle: &str) -> bool;
}

/// On-disk shape of a collection document
#[derive(Debug, Deserialize)]
struct CollectionFile<T> {
    collection: String,
    entries: Vec<T>,
}

/// Ordered, immutable set of entries for one subject area
#[derive(Debug)]
pub struct Collection<T> {
    name: String,
    entries: Vec<T>,
    load_error: Option<String>,
}

impl<T> Collection<T> {
    /// Build a collection from entries already in memory
    pub fn new(name: impl Into<String>, entries: Vec<T>) -> Self {
        Self {
            name: name.into(),
            entries,
            load_error: None,
        }
    }

    /// Collection name (e.g. "clinical-reasoning")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries in source order
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Get the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Why the collection's document failed to load, if it did
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }
}

impl<T: DeserializeOwned> Collection<T> {
    /// Parse a collection document
    pub fn from_yaml(name: &str, source: &str) -> Result<Self, LoadError> {
        let file: CollectionFile<T> =
            serde_yaml::from_str(source).map_err(|e| LoadError::Parse {
                collection: name.to_string(),
                source: e,
            })?;

        if file.collection != name {
            return Err(LoadError::NameMismatch {
                expected: name.to_string(),
                found: file.collection,
            });
        }

        Ok(Self::new(name, file.entries))
    }

    /// Parse a bundled document, degrading to an empty collection on error.
    ///
    /// The error is logged and kept for the validator; queries against the
    /// collection return no results.
    pub fn load_bundled(name: &str, source: &str) -> Self {
        match Self::from_yaml(name, source) {
            Ok(collection) => {
                tracing::debug!(collection = name, entries = collection.len(), "Loaded collection");
                collection
            }
            Err(e) => {
                tracing::error!(collection = name, error = %e, "Collection failed to load");
                Self {
                    name: name.to_string(),
                    entries: Vec::new(),
                    load_error: Some(e.to_string()),
                }
            }
        }
    }
}

impl<T: CatalogEntry> Collection<T> {
    /// Get an entry by id.
    ///
    /// Ids are expected to be unique; if an authoring error duplicates one,
    /// the first entry in source order is returned.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Search entries by query (case-insensitive substring match).
    ///
    /// The query is not trimmed, so an empty query matches every entry.
    pub fn search(&self, query: &str) -> Vec<&T> {
        let query_lower = query.to_lowercase();

        self.entries
            .iter()
            .filter(|e| e.matches(&query_lower))
            .collect()
    }

    /// Entries whose category is any of `categories`; empty input matches nothing
    pub fn filter_by_category(&self, categories: &[T::Category]) -> Vec<&T> {
        let wanted: HashSet<T::Category> = categories.iter().copied().collect();

        self.entries
            .iter()
            .filter(|e| wanted.contains(&e.category()))
            .collect()
    }

    /// Number of entries in each category, in first-seen order
    pub fn category_counts(&self) -> Vec<(T::Category, usize)> {
        let mut counts: Vec<(T::Category, usize)> = Vec::new();
        for entry in &self.entries {
            let category = entry.category();
            match counts.iter_mut().find(|(c, _)| *c == category) {
                Some((_, n)) => *n += 1,
                None => counts.push((category, 1)),
            }
        }
        counts
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Lowercased substring test shared by the per-collection search predicates
pub(crate) fn contains_lower(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

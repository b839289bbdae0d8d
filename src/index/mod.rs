//! Content-addressed index of file records.
//!
//! # Overview
//!
//! An [`Index`] maps a content key (the lowercase hex MD5 digest of a file's
//! contents) to the ordered list of [`FileRecord`]s whose files hashed to
//! that key. Files with identical content land under the same key, so every
//! group with more than one record is a set of duplicates.
//!
//! The index only grows: records are appended during a scan and never
//! removed. Order within a group is scan order.
//!
//! # Example
//!
//! ```no_run
//! use dupeindex::index::Indexer;
//! use std::path::Path;
//!
//! let index = Indexer::new().index_dir(Path::new("."))?;
//! for (key, records) in index.duplicates() {
//!     println!("{key}: {} copies", records.len());
//! }
//! # Ok::<(), dupeindex::index::IndexError>(())
//! ```

pub mod builder;
pub mod record;

use std::collections::BTreeMap;

use crate::scanner::{HashError, Hasher};

pub use builder::{IndexError, Indexer};
pub use record::{zero_time, FileRecord};

/// Mapping from content key to the records sharing that content.
///
/// The backing container is private; use [`Index::get`] and [`Index::all`]
/// to read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    groups: BTreeMap<String, Vec<FileRecord>>,
}

impl Index {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by hashing every record in `records`.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be hashed.
    pub fn from_records<I>(records: I) -> Result<Self, HashError>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        Indexer::new().index_records(records)
    }

    /// Hash the file `record` refers to and append the record under the
    /// resulting key. Returns the key.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be read; the index is left
    /// unchanged in that case.
    pub fn insert(&mut self, record: FileRecord) -> Result<String, HashError> {
        self.insert_hashed(&Hasher::new(), record)
    }

    /// Same as [`Index::insert`] with an explicit hasher.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be read.
    pub fn insert_hashed(
        &mut self,
        hasher: &Hasher,
        record: FileRecord,
    ) -> Result<String, HashError> {
        let key = hasher.content_key(record.path())?;
        self.insert_with_key(key.clone(), record);
        Ok(key)
    }

    /// Append `record` under an already computed `key`.
    pub fn insert_with_key(&mut self, key: String, record: FileRecord) {
        self.groups.entry(key).or_default().push(record);
    }

    /// Records stored under `key`, in insertion order.
    ///
    /// Returns an empty slice for unknown keys.
    #[must_use]
    pub fn get(&self, key: &str) -> &[FileRecord] {
        self.groups.get(key).map_or(&[], Vec::as_slice)
    }

    /// Whether any record is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    /// Every `(key, records)` group in the index.
    pub fn all(&self) -> impl Iterator<Item = (&str, &[FileRecord])> + '_ {
        self.groups
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }

    /// Only the groups holding two or more records.
    pub fn duplicates(&self) -> impl Iterator<Item = (&str, &[FileRecord])> + '_ {
        self.all().filter(|(_, records)| records.len() > 1)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the index holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all keys.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<FileRecord>)> for Index {
    fn from_iter<T: IntoIterator<Item = (String, Vec<FileRecord>)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (key, records) in iter {
            for record in records {
                index.insert_with_key(key.clone(), record);
            }
        }
        index
    }
}

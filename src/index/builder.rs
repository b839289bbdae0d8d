//! Index construction: walk a tree and group its files by content.
//!
//! # Overview
//!
//! [`Indexer`] turns a stream of [`FileRecord`]s into an [`Index`] by
//! hashing each referenced file. Hashing always re-reads the file from disk,
//! so a file changed after the walk is keyed by its new content while its
//! record keeps the metadata seen during the walk.
//!
//! Any error aborts the build; a partial index is never returned.

use std::path::Path;
use std::sync::Arc;

use super::{FileRecord, Index};
use crate::progress::ProgressCallback;
use crate::scanner::{HashError, Hasher, ScanError, Walker, DEFAULT_PROGRESS_INTERVAL};

/// Errors that can occur while building an index from a directory.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// The directory walk failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Builds an [`Index`] from files on disk.
///
/// # Example
///
/// ```no_run
/// use dupeindex::index::Indexer;
/// use std::path::Path;
///
/// let index = Indexer::new()
///     .with_progress_interval(500)
///     .index_dir(Path::new("/some/path"))?;
/// println!("{} distinct contents", index.len());
/// # Ok::<(), dupeindex::index::IndexError>(())
/// ```
pub struct Indexer {
    hasher: Hasher,
    progress_interval: usize,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl Default for Indexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Indexer {
    /// Create an indexer with the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(Hasher::new())
    }

    /// Create an indexer that uses `hasher` for content keys.
    #[must_use]
    pub fn with_hasher(hasher: Hasher) -> Self {
        Self {
            hasher,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress_callback: None,
        }
    }

    /// Set how many files are walked between progress notifications.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set a progress callback notified while walking and hashing.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Group `records` by the content of the files they reference.
    ///
    /// # Errors
    ///
    /// Returns the first [`HashError`]; no index is produced in that case.
    pub fn index_records<I>(&self, records: I) -> Result<Index, HashError>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        let mut index = Index::new();
        for record in records {
            index.insert_hashed(&self.hasher, record)?;
        }
        Ok(index)
    }

    /// Walk `root` recursively and index every file found.
    ///
    /// The whole tree is walked first, then every file is hashed.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Scan`] if the walk fails and
    /// [`IndexError::Hash`] if a file cannot be hashed.
    pub fn index_dir(&self, root: &Path) -> Result<Index, IndexError> {
        let start_time = std::time::Instant::now();

        let mut walker = Walker::new(root).with_progress_interval(self.progress_interval);
        if let Some(ref callback) = self.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }

        let walk = walker.walk()?;
        log::info!("Indexing {}", walk.root().display());
        let records = walk.collect::<Result<Vec<_>, _>>()?;
        log::info!("scanned {} files", records.len());

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("hashing", records.len());
        }

        let mut index = Index::new();
        for (i, record) in records.into_iter().enumerate() {
            if let Some(ref callback) = self.progress_callback {
                callback.on_progress(i + 1, &record.path().to_string_lossy());
            }
            index.insert_hashed(&self.hasher, record)?;
        }

        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("hashing");
        }

        log::info!(
            "Indexed {} files into {} keys in {:.2?}",
            index.record_count(),
            index.len(),
            start_time.elapsed()
        );

        Ok(index)
    }
}

//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and producing one [`FileRecord`] per non-directory entry. Traversal is a
//! pull-based iterator ([`Walk`]): records are produced one at a time, in a
//! single pass, and the walk cannot be restarted.
//!
//! # Failure policy
//!
//! Traversal is all-or-nothing. The first error is yielded as `Err` and the
//! iterator returns `None` from then on.
//!
//! # Example
//!
//! ```no_run
//! use dupeindex::scanner::Walker;
//! use std::path::Path;
//!
//! let records: Result<Vec<_>, _> = Walker::new(Path::new("/home/user/Downloads"))
//!     .with_progress_interval(500)
//!     .walk()?
//!     .collect();
//! println!("Found {} files", records?.len());
//! # Ok::<(), dupeindex::scanner::ScanError>(())
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::ScanError;
use crate::index::FileRecord;
use crate::progress::ProgressCallback;

/// Number of records between two progress notifications.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk, as given by the caller
    root: PathBuf,
    /// Records between progress notifications
    progress_interval: usize,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            progress_callback: None,
        }
    }

    /// Set how many records are produced between progress notifications.
    ///
    /// A value of zero is treated as one.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Set a progress callback notified while walking.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Resolve the root and start walking.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Resolve`] if the root cannot be made absolute.
    pub fn walk(self) -> Result<Walk, ScanError> {
        let root = std::path::absolute(&self.root).map_err(|source| ScanError::Resolve {
            path: self.root.clone(),
            source,
        })?;

        log::debug!("Walking {}", root.display());
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let inner = WalkDir::new(&root)
            .follow_links(false)
            .follow_root_links(false)
            .into_iter();

        Ok(Walk {
            inner,
            root,
            produced: 0,
            progress_interval: self.progress_interval,
            progress_callback: self.progress_callback,
            done: false,
        })
    }
}

/// An in-progress directory walk.
///
/// Yields a [`FileRecord`] for every entry that is not a directory.
pub struct Walk {
    inner: walkdir::IntoIter,
    root: PathBuf,
    produced: usize,
    progress_interval: usize,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    done: bool,
}

impl Walk {
    /// The resolved absolute root of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of records produced so far.
    #[must_use]
    pub fn produced(&self) -> usize {
        self.produced
    }

    fn finish(&mut self) {
        self.done = true;
        log::debug!("Walk of {} finished after {} files", self.root.display(), self.produced);
        if let Some(ref callback) = self.progress_callback {
            callback.on_phase_end("walking");
        }
    }

    fn report_progress(&self, path: &Path) {
        if self.produced % self.progress_interval != 0 {
            return;
        }
        log::info!("scanned {} files", self.produced);
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(self.produced, &path.to_string_lossy());
        }
    }
}

impl Iterator for Walk {
    type Item = Result<FileRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let entry = match self.inner.next() {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    let err = map_walkdir_error(&self.root, e);
                    log::error!("Walk aborted: {}", err);
                    self.finish();
                    return Some(Err(err));
                }
                None => {
                    self.finish();
                    return None;
                }
            };

            // Directories are descended into but never recorded
            if entry.file_type().is_dir() {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(e) => {
                    let err = map_walkdir_error(entry.path(), e);
                    log::error!("Walk aborted: {}", err);
                    self.finish();
                    return Some(Err(err));
                }
            };

            let record = FileRecord::from_metadata(entry.into_path(), &metadata);
            self.produced += 1;
            log::trace!("Found {}", record.path().display());
            self.report_progress(record.path());

            return Some(Ok(record));
        }
    }
}

/// Convert a walkdir error into a [`ScanError`].
fn map_walkdir_error(fallback: &Path, error: walkdir::Error) -> ScanError {
    let path = error
        .path()
        .map_or_else(|| fallback.to_path_buf(), Path::to_path_buf);

    match error.into_io_error() {
        Some(io) => match io.kind() {
            ErrorKind::PermissionDenied => ScanError::PermissionDenied(path),
            ErrorKind::NotFound => ScanError::NotFound(path),
            _ => ScanError::Io { path, source: io },
        },
        None => ScanError::Io {
            path,
            source: std::io::Error::other("filesystem loop detected"),
        },
    }
}

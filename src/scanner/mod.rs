//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Lazy, single-threaded directory walking using walkdir
//! - Content hashing with MD5 (streaming)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and [`FileRecord`](crate::index::FileRecord) production
//! - [`hasher`]: Content keys for files
//!
//! # Example
//!
//! ```no_run
//! use dupeindex::scanner::Walker;
//! use std::path::Path;
//!
//! let walk = Walker::new(Path::new(".")).walk()?;
//! for record in walk {
//!     let record = record?;
//!     println!("{}: {} bytes", record.path().display(), record.size());
//! }
//! # Ok::<(), dupeindex::scanner::ScanError>(())
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{Hasher, DEFAULT_BUFFER_SIZE};
pub use walker::{Walk, Walker, DEFAULT_PROGRESS_INTERVAL};

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The root path could not be resolved to an absolute path.
    #[error("Cannot resolve {path}: {source}")]
    Resolve {
        /// Path as given by the caller
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

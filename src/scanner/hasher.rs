//! MD5 content hasher with streaming support.
//!
//! # Overview
//!
//! This module provides the [`Hasher`] struct for computing content keys:
//! the lowercase hex MD5 digest of a file's full contents. Files are read in
//! fixed-size chunks so memory use does not grow with file size.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::HashError;

/// Default read buffer size (64 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Computes content keys for files.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Set the read buffer size (clamped to at least 1 byte).
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Compute the content key of the file at `path`.
    ///
    /// The file is opened fresh on every call and closed before returning.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or fully read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dupeindex::scanner::Hasher;
    /// use std::path::Path;
    ///
    /// let key = Hasher::new().content_key(Path::new("Cargo.toml"))?;
    /// assert_eq!(key.len(), 32);
    /// # Ok::<(), dupeindex::scanner::HashError>(())
    /// ```
    pub fn content_key(&self, path: &Path) -> Result<String, HashError> {
        let mut file = File::open(path).map_err(|e| map_io_error(path, e))?;
        let mut context = md5::Context::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(map_io_error(path, e)),
            };
            context.consume(&buffer[..read]);
        }

        Ok(format!("{:x}", context.compute()))
    }
}

fn map_io_error(path: &Path, error: std::io::Error) -> HashError {
    match error.kind() {
        ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

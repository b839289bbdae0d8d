//! File metadata snapshots stored in the index.
//!
//! A [`FileRecord`] captures what the filesystem reported for one entry at
//! scan time. Records are never updated in place; a rescan produces new ones.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seconds between 0001-01-01T00:00:00Z and the Unix epoch.
const ZERO_TIME_UNIX_SECS: i64 = -62_135_596_800;

/// The zero timestamp, `0001-01-01T00:00:00Z`.
///
/// Used for records that carry no modification time and as the fallback on
/// platforms that cannot report one.
#[must_use]
pub fn zero_time() -> DateTime<Utc> {
    DateTime::from_timestamp(ZERO_TIME_UNIX_SECS, 0).unwrap_or_default()
}

/// Static snapshot of one file's metadata.
///
/// Serialized with the field names `name`, `size`, `mode`, `modTime` and
/// `isDir`, in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Full path of the file as captured at scan time
    #[serde(rename = "name")]
    path: PathBuf,
    /// File size in bytes
    size: u64,
    /// Raw permission and type bits
    mode: u32,
    /// Last modification time
    #[serde(rename = "modTime")]
    mod_time: DateTime<Utc>,
    /// Whether the entry was a directory
    #[serde(rename = "isDir")]
    is_dir: bool,
}

impl FileRecord {
    /// Create a record from explicit field values.
    ///
    /// # Example
    ///
    /// ```
    /// use dupeindex::index::{zero_time, FileRecord};
    ///
    /// let record = FileRecord::new("/tmp/a.txt".into(), 12, 0o644, zero_time(), false);
    /// assert_eq!(record.size(), 12);
    /// ```
    #[must_use]
    pub fn new(
        path: PathBuf,
        size: u64,
        mode: u32,
        mod_time: DateTime<Utc>,
        is_dir: bool,
    ) -> Self {
        Self {
            path,
            size,
            mode,
            mod_time,
            is_dir,
        }
    }

    /// Create a record for `path` from the metadata the filesystem reported.
    ///
    /// The stored path is `path` as given; callers pass the full resolved
    /// path rather than the base name.
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let mod_time = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| zero_time());

        Self {
            path,
            size: metadata.len(),
            mode: mode_bits(metadata),
            mod_time,
            is_dir: metadata.is_dir(),
        }
    }

    /// A record that only names a path; every other field is zero.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::new(path.into(), 0, 0, zero_time(), false)
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes at scan time.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Permission and type bits at scan time.
    #[must_use]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// Modification time at scan time.
    #[must_use]
    pub fn mod_time(&self) -> DateTime<Utc> {
        self.mod_time
    }

    /// Whether the entry was a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

#[cfg(unix)]
fn mode_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

//! Data structures for persisted index files.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use flate2::GzHeader;
use serde::{Deserialize, Serialize, Serializer};

use crate::index::{FileRecord, Index};

/// File name label stored in the gzip header.
pub const CACHE_FILE_NAME: &str = "cache.json";

/// Comment stored in the gzip header.
pub const CACHE_COMMENT: &str = "A cache file for dupeindex";

/// Descriptive fields read from the gzip header of an index file.
///
/// Informational only; an index file is valid regardless of what these hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    /// Internal file name label
    pub name: Option<String>,
    /// Free-text comment
    pub comment: Option<String>,
    /// When the file was written (second precision)
    pub modified: Option<DateTime<Utc>>,
}

impl Provenance {
    pub(crate) fn from_header(header: &GzHeader) -> Self {
        let modified = match header.mtime() {
            0 => None,
            secs => DateTime::from_timestamp(i64::from(secs), 0),
        };

        Self {
            name: header
                .filename()
                .map(|b| String::from_utf8_lossy(b).into_owned()),
            comment: header
                .comment()
                .map(|b| String::from_utf8_lossy(b).into_owned()),
            modified,
        }
    }
}

/// Serialized view of an [`Index`]: a JSON object of key -> record array.
pub(crate) struct Payload<'a>(pub(crate) &'a Index);

impl Serialize for Payload<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.all())
    }
}

/// Owned form of the payload used when reading.
#[derive(Deserialize)]
#[serde(transparent)]
pub(crate) struct OwnedPayload(BTreeMap<String, Vec<FileRecord>>);

impl From<OwnedPayload> for Index {
    fn from(payload: OwnedPayload) -> Self {
        payload.0.into_iter().collect()
    }
}

//! Store module for persisting and restoring indexes.
//!
//! An index file is a gzip stream whose header carries a file name label,
//! a comment and the write time, wrapping a compact JSON payload:
//!
//! ```text
//! {"<content key>":[{"name":"<path>","size":0,"mode":0,"modTime":"0001-01-01T00:00:00Z","isDir":false}]}
//! ```
//!
//! Field names and casing are fixed; files written by earlier tools that use
//! the same layout can be read back.
//!
//! # Architecture
//!
//! * [`data`]: Provenance metadata and the serialized view of an index.
//! * [`io`]: Encoding, decoding, reading and writing index files.

pub mod data;
pub mod io;

pub use data::{Provenance, CACHE_COMMENT, CACHE_FILE_NAME};
pub use io::{decode, encode, read_index, read_with_provenance, write_index, StoreError};

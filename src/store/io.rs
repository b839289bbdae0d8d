//! I/O operations for index files.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use flate2::bufread::GzDecoder;
use flate2::{Compression, GzBuilder};

use super::data::{OwnedPayload, Payload, Provenance, CACHE_COMMENT, CACHE_FILE_NAME};
use crate::index::Index;

/// Errors that can occur while persisting or restoring an index.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The index could not be encoded as JSON.
    #[error("Failed to encode index: {0}")]
    Encode(#[source] serde_json::Error),

    /// The decompressed payload is not a valid index.
    #[error("Failed to decode index: {0}")]
    Decode(#[source] serde_json::Error),

    /// The payload could not be compressed.
    #[error("Failed to compress index: {0}")]
    Compress(#[source] std::io::Error),

    /// The input is not a readable gzip stream.
    #[error("Failed to decompress index: {0}")]
    Decompress(#[source] std::io::Error),

    /// The index file could not be written.
    #[error("Failed to write index file {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The index file could not be opened.
    #[error("Failed to read index file {path}: {source}")]
    Read {
        /// Source path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Encode `index` as gzip-compressed JSON with provenance metadata.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] or [`StoreError::Compress`].
pub fn encode(index: &Index) -> Result<Vec<u8>, StoreError> {
    let payload = serde_json::to_vec(&Payload(index)).map_err(StoreError::Encode)?;

    let mtime = u32::try_from(Utc::now().timestamp()).unwrap_or(0);
    let mut encoder = GzBuilder::new()
        .filename(CACHE_FILE_NAME)
        .comment(CACHE_COMMENT)
        .mtime(mtime)
        .write(Vec::new(), Compression::default());

    encoder.write_all(&payload).map_err(StoreError::Compress)?;
    encoder.finish().map_err(StoreError::Compress)
}

/// Decode an index from a gzip stream produced by [`encode`].
///
/// The stream must hold exactly one gzip member; anything after it is
/// rejected.
///
/// # Errors
///
/// Returns [`StoreError::Decompress`] or [`StoreError::Decode`].
pub fn decode<R: Read>(reader: R) -> Result<(Index, Provenance), StoreError> {
    let mut decoder = GzDecoder::new(BufReader::new(reader));
    let mut payload = Vec::new();
    decoder
        .read_to_end(&mut payload)
        .map_err(StoreError::Decompress)?;

    let provenance = decoder
        .header()
        .map(Provenance::from_header)
        .unwrap_or_default();

    let mut rest = decoder.into_inner();
    let trailing = rest.fill_buf().map_err(StoreError::Decompress)?;
    if !trailing.is_empty() {
        return Err(StoreError::Decompress(std::io::Error::new(
            ErrorKind::InvalidData,
            "trailing data after gzip stream",
        )));
    }

    let payload: OwnedPayload = serde_json::from_slice(&payload).map_err(StoreError::Decode)?;
    Ok((payload.into(), provenance))
}

/// Write `index` to `path`, replacing any existing file.
///
/// On Unix the file is left readable and writable by its owner only.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding fails or the file cannot be written.
pub fn write_index(index: &Index, path: &Path) -> Result<(), StoreError> {
    let bytes = encode(index)?;
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = owner_only_options().open(path).map_err(write_err)?;
    restrict_permissions(&file).map_err(write_err)?;
    file.write_all(&bytes).map_err(write_err)?;

    log::debug!(
        "Wrote {} keys ({} bytes) to {}",
        index.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

/// Read an index from `path`, logging its provenance.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be opened, decompressed or
/// decoded.
pub fn read_index(path: &Path) -> Result<Index, StoreError> {
    read_with_provenance(path).map(|(index, _)| index)
}

/// Read an index and its provenance from `path`.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be opened, decompressed or
/// decoded.
pub fn read_with_provenance(path: &Path) -> Result<(Index, Provenance), StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (index, provenance) = decode(file)?;

    log::info!("Name: {}", provenance.name.as_deref().unwrap_or(""));
    log::info!("Comment: {}", provenance.comment.as_deref().unwrap_or(""));
    match provenance.modified {
        Some(modified) => log::info!("ModTime: {}", modified),
        None => log::info!("ModTime: unknown"),
    }

    Ok((index, provenance))
}

fn owner_only_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

// The mode passed at creation is ignored when the file already exists.
#[cfg(unix)]
fn restrict_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}

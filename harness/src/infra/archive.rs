//! Temp-file handling for downloaded archives.
//!
//! Blocking filesystem code; async callers wrap it in `spawn_blocking`.

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tempfile::NamedTempFile;

/// Write `bytes` to a fresh temp file, removed when the guard is dropped.
///
/// # Errors
///
/// Returns an error if the temp file cannot be created or written.
pub fn write_temp_copy(bytes: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("cnb-archive-")
        .suffix(".tgz")
        .tempfile()
        .context("creating temp archive file")?;
    file.write_all(bytes)
        .with_context(|| format!("writing {}", file.path().display()))?;
    file.flush()
        .with_context(|| format!("flushing {}", file.path().display()))?;
    Ok(file)
}

/// Unpack a gzip-compressed tar archive into a fresh temp directory.
///
/// The directory is kept for the caller. On failure it is removed.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or is malformed.
pub fn extract_tar_gz(archive: &Path) -> Result<PathBuf> {
    let dest = tempfile::Builder::new()
        .prefix("cnb-extract-")
        .tempdir()
        .context("creating extraction directory")?;
    let file = File::open(archive).with_context(|| format!("opening {}", archive.display()))?;
    tar::Archive::new(GzDecoder::new(BufReader::new(file)))
        .unpack(dest.path())
        .with_context(|| format!("extracting {}", archive.display()))?;
    Ok(dest.keep())
}

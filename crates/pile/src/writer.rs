//! Writing the pile to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::layout::{DATUM_BYTES, DATUM_OFFSET, GEOID_BYTES, GEOID_OFFSET};
use crate::pile::Pile;

/// Result of writing a pile file.
#[derive(Debug, Clone, PartialEq)]
pub struct PileWriteResult {
    /// Path that was written.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes_written: usize,
}

/// Generate a pile and write it to `path`, creating or truncating the file.
pub fn write_pile_file(path: impl AsRef<Path>) -> Result<PileWriteResult> {
    write_pile_to_file(&Pile::generate(), path)
}

/// Write an existing pile to `path`, creating or truncating the file.
pub fn write_pile_to_file(pile: &Pile, path: impl AsRef<Path>) -> Result<PileWriteResult> {
    let path = path.as_ref();
    let bytes = pile.to_bytes();

    debug!(offset = GEOID_OFFSET, bytes = GEOID_BYTES, "Writing geoid grid");
    debug!(offset = DATUM_OFFSET, bytes = DATUM_BYTES, "Writing datum grid");

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes)?;
    writer.flush()?;

    info!(path = %path.display(), bytes = bytes.len(), "Wrote pile file");

    Ok(PileWriteResult {
        path: path.to_path_buf(),
        bytes_written: bytes.len(),
    })
}

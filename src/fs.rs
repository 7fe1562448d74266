//! File access for documents.
//!
//! Setup files copied off installation media are usually read-only; writing
//! a document back clears that attribute first.

use crate::error::Result;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a whole file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be read.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    Ok(fs::read(path)?)
}

/// Writes a whole file, clearing its read-only attribute if set.
///
/// # Errors
///
/// Returns `Io` if the attribute cannot be cleared or the file cannot be
/// written.
pub fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Ok(metadata) = fs::metadata(path) {
        let mut permissions = metadata.permissions();
        if permissions.readonly() {
            debug!(path = %path.display(), "Clearing read-only attribute");
            #[allow(clippy::permissions_set_readonly_false)]
            permissions.set_readonly(false);
            fs::set_permissions(path, permissions)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

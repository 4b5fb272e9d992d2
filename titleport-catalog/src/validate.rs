//! Advisory package validation.
//!
//! A zip package is opened and its entry headers read before upload. The
//! result is only logged by the uploader: the service is the authority on
//! what it accepts, so a package that fails here is still sent.

use std::io::Cursor;

use zip::ZipArchive;

use crate::error::PackageValidationError;

/// Checks that `bytes` is a readable, non-empty zip archive.
///
/// Returns the number of entries.
pub fn check_zip_bytes(bytes: &[u8]) -> Result<usize, PackageValidationError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PackageValidationError::InvalidArchive(e.to_string()))?;

    if archive.is_empty() {
        return Err(PackageValidationError::Empty);
    }

    for index in 0..archive.len() {
        archive
            .by_index(index)
            .map_err(|e| PackageValidationError::InvalidArchive(e.to_string()))?;
    }

    Ok(archive.len())
}

//! Reading input files with size and encoding validation.

use std::fs;
use std::path::Path;

use crate::error::{Result, SnoopError};

/// Maximum size of a single input file (10 MiB).
///
/// Bundles above this are almost always vendor blobs or source maps renamed to `.js`.
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Read a JavaScript file into memory.
///
/// The size is checked from metadata before reading and again afterwards, in case the file grew
/// in between.
pub fn read_source(path: &Path) -> Result<String> {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.len() > MAX_FILE_SIZE as u64 {
            return Err(SnoopError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len() as usize,
                max: MAX_FILE_SIZE,
            });
        }
    }

    let bytes = fs::read(path).map_err(|source| SnoopError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(SnoopError::FileTooLarge {
            path: path.to_path_buf(),
            size: bytes.len(),
            max: MAX_FILE_SIZE,
        });
    }

    String::from_utf8(bytes).map_err(|source| SnoopError::InvalidUtf8 {
        path: path.to_path_buf(),
        source,
    })
}

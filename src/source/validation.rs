//! Input validation performed before a file is opened for aggregation.

use crate::error::{RbrcError, Result};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Validate that a path points at a readable regular file
///
/// # Validations Performed
/// - Path exists
/// - Path is a regular file (not a directory or device)
/// - File can be opened for reading by the current process
///
/// An empty file passes validation: it aggregates to an empty summary.
pub fn validate_input_path(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RbrcError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => RbrcError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => RbrcError::file_error(
            format!("Failed to read metadata: {}", path.display()),
            e,
        ),
    })?;

    if !metadata.is_file() {
        return Err(RbrcError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    // Verify read permissions up front so the error names the path
    File::open(path).map_err(|e| match e.kind() {
        ErrorKind::PermissionDenied => RbrcError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => RbrcError::file_error(
            format!("Cannot open file for reading: {}", path.display()),
            e,
        ),
    })?;

    Ok(())
}

//! Path and input validation utilities.

use std::error::Error;
use std::path::Path;

/// Validate that a path exists and return an error if it doesn't.
///
/// # Arguments
///
/// * `path` - The path to validate
///
/// # Returns
///
/// * `Ok(())` if the path exists
/// * `Err` with a formatted error message if the path doesn't exist
pub fn validate_path_exists(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()).into());
    }
    Ok(())
}

/// True for an existing regular file, following symlinks.
pub fn is_regular_file(path: &Path) -> bool {
    path.metadata().is_ok_and(|meta| meta.is_file())
}

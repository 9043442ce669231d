//! Output file naming

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Work out where the merged PDF should be written
///
/// - `.pdf` is appended unless the name already ends with it (any case)
/// - an absolute path is used as-is
/// - a relative name is placed directly in `output_dir`; any directory
///   parts of the name are dropped
pub fn resolve_output_path(output_dir: &Path, filename: &str) -> Result<PathBuf> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(Error::EmptyOutputName);
    }

    let mut name = filename.to_string();
    if !name.to_lowercase().ends_with(".pdf") {
        name.push_str(".pdf");
    }

    let path = PathBuf::from(name);
    if path.is_absolute() {
        return Ok(path);
    }

    match path.file_name() {
        Some(file_name) => Ok(output_dir.join(file_name)),
        None => Err(Error::EmptyOutputName),
    }
}

/// Create every missing directory above `path`
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

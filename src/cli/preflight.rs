//! Pre-flight checks before expensive operations.
//!
//! Validates configuration before loading models or calling hosted services,
//! so a missing key fails fast instead of after the document is indexed.

use crate::config::Settings;
use crate::error::{EkkoError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Asking needs the API key and a usable temp directory.
    Ask,
    /// Search runs locally.
    Search,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Ask => {
            settings.llm.api_key()?;
            check_writable_dir(&settings.temp_dir())?;
        }
        Operation::Search => {}
    }
    Ok(())
}

/// Check that the document exists before any model is loaded.
pub fn check_document(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EkkoError::InvalidArgument(format!(
            "document not found: {}",
            path.display()
        )))
    }
}

/// Ensure a directory exists and accepts new files.
pub fn check_writable_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        EkkoError::Config(format!("cannot create {}: {}", dir.display(), e))
    })?;
    tempfile::tempfile_in(dir).map_err(|e| {
        EkkoError::Config(format!("{} is not writable: {}", dir.display(), e))
    })?;
    Ok(())
}

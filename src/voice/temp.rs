//! Scoped temporary audio files.

use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;
use tracing::{debug, warn};

/// A recording written to disk for the duration of one question.
///
/// The file is removed when the value is dropped, whichever way the question
/// ends. Removal errors are logged and ignored.
#[derive(Debug)]
pub struct TempAudioFile {
    path: Option<TempPath>,
}

impl TempAudioFile {
    /// Write `bytes` to a new `.wav` file inside `dir`.
    pub fn create_in(dir: &Path, bytes: &[u8]) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::Builder::new()
            .prefix("ekko-question-")
            .suffix(".wav")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        let path = file.into_temp_path();
        debug!("Wrote {} bytes of audio to {}", bytes.len(), path.display());
        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> &Path {
        // Only `Drop` takes the path out.
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }
}

impl Drop for TempAudioFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            let path_str = path.display().to_string();
            match path.close() {
                Ok(()) => debug!("Removed temp audio {}", path_str),
                Err(e) => warn!("Failed to remove temp audio {}: {}", path_str, e),
            }
        }
    }
}

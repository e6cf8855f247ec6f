//! Delivering the processed document.
//!
//! In a browser the result blob is wrapped in an object URL, bound to a
//! throwaway anchor and clicked. Outside a browser "start a download" means
//! whatever the host does with a named byte payload, so the uploader only
//! talks to a [`DownloadSink`]. [`FileSink`] is the desktop version: it
//! writes into a directory.

use crate::error::ReaderError;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Something that can take a named payload and make it available to the user.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Deliver `payload` under `filename`. Returns where it ended up.
    async fn deliver(&self, filename: &str, payload: Vec<u8>) -> Result<PathBuf, ReaderError>;
}

/// Writes downloads into a directory.
///
/// Each payload goes to a temp file in the target directory first and is then
/// renamed into place, so a failed write never leaves a truncated document
/// under the final name. An existing file with the same name is replaced,
/// matching what a browser does with "overwrite" download settings.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for FileSink {
    async fn deliver(&self, filename: &str, payload: Vec<u8>) -> Result<PathBuf, ReaderError> {
        // Keep only the final component so the name cannot escape `dir`.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| ReaderError::Internal(format!("unusable download name '{filename}'")))?;
        let target = self.dir.join(name);
        let dir = self.dir.clone();

        tokio::task::spawn_blocking(move || write_atomically(&dir, &target, &payload))
            .await
            .map_err(|e| ReaderError::Internal(format!("download writer panicked: {e}")))?
    }
}

fn write_atomically(dir: &Path, target: &Path, payload: &[u8]) -> Result<PathBuf, ReaderError> {
    let write_err = |source: std::io::Error| ReaderError::OutputWriteFailed {
        path: target.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(payload).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(target).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", payload.len(), target.display());
    Ok(target.to_path_buf())
}

//! The file the user picked.
//!
//! A browser hands the page an opaque blob with a name and a MIME type. On
//! the desktop the equivalent is a path: we read it fully into memory, keep
//! the final path component as the name and guess the MIME type from the
//! extension. The picker's accept filter (`application/pdf,image/*`) is only
//! a hint, so [`SelectedFile::is_accepted`] never rejects anything by itself.

use crate::error::ReaderError;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// MIME type used when the extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A document held by the uploader for one upload cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, the way a file picker would hand it over.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let path = path.as_ref();

        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReaderError::FileNotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => ReaderError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => ReaderError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ReaderError::FileNotFound {
                path: path.to_path_buf(),
            })?;
        let mime = guess_mime(&name);

        debug!("Selected {} ({}, {} bytes)", name, mime, bytes.len());
        Ok(Self { name, mime, bytes })
    }

    /// Content type sent with the upload.
    ///
    /// Blank or unparsable types go out as `application/octet-stream`, the
    /// way a browser form sends a file whose type it could not determine.
    pub fn upload_mime(&self) -> String {
        match self.mime.trim().parse::<mime_guess::Mime>() {
            Ok(m) => m.essence_str().to_string(),
            Err(_) => OCTET_STREAM.to_string(),
        }
    }

    /// Whether the file matches the picker's accept hint.
    pub fn is_accepted(&self) -> bool {
        is_accepted_mime(&self.mime)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Guess a MIME type from a file name's extension.
pub fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}

/// `application/pdf` or any `image/*`.
pub fn is_accepted_mime(mime: &str) -> bool {
    mime == "application/pdf" || mime.starts_with("image/")
}

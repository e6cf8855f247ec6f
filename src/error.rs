//! Error type for the smart-reader library.
//!
//! Every way an upload can go wrong collapses into one [`ReaderError`].
//! The uploader catches all of them at a single boundary and turns them into
//! the same user-facing notice, so the variants exist for logging and for
//! library callers, not for branching UI behaviour.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when an error renders to an empty string.
pub const FALLBACK_MESSAGE: &str = "Error";

/// All errors returned by the smart-reader library.
#[derive(Debug, Error)]
pub enum ReaderError {
    // ── Request errors ────────────────────────────────────────────────────
    /// The processing service answered with a non-success status.
    ///
    /// The status is kept for logs; the message is deliberately generic.
    #[error("Processing failed")]
    RequestFailed { status: u16 },

    /// The request never produced a response, or the body could not be read.
    #[error("{reason}")]
    Transport { reason: String },

    // ── Input errors ──────────────────────────────────────────────────────
    /// Selected file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but reading it failed.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the downloaded document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ReaderError {
    /// Text for the failure notice: the error's message, or
    /// [`FALLBACK_MESSAGE`] when the message is blank.
    pub fn user_message(&self) -> String {
        let msg = self.to_string();
        if msg.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            msg
        }
    }
}

impl From<reqwest::Error> for ReaderError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest hides the interesting part (connection refused, dns) in the
        // source chain, so flatten it into the message.
        let mut reason = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(inner) = source {
            reason.push_str(": ");
            reason.push_str(&inner.to_string());
            source = inner.source();
        }
        ReaderError::Transport { reason }
    }
}

//! # smart-reader
//!
//! Client for a document-reconstruction service: pick a PDF or an image,
//! upload it, save the processed PDF the service sends back.
//!
//! The crate does no document processing itself. It builds one multipart
//! request, waits for the binary answer and hands it to a download sink.
//!
//! ## Flow
//!
//! ```text
//! SelectedFile
//!  │
//!  ├─ 1. Select   Uploader::select_file (replaces any earlier pick)
//!  ├─ 2. Trigger  busy = true; second triggers are ignored
//!  ├─ 3. Upload   POST <endpoint>/process/ with part `file`
//!  ├─ 4. Deliver  2xx body → DownloadSink as reconstructed_<name>.pdf
//!  └─ 5. Settle   failures → Notifier; busy = false on every path
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use smart_reader::{ClientConfig, FileSink, SelectedFile, TracingNotifier, Uploader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let uploader = Uploader::new(
//!         ClientConfig::default(),
//!         Arc::new(TracingNotifier),
//!         Arc::new(FileSink::new(".")),
//!     )?;
//!     uploader.select_file(Some(SelectedFile::from_path("notes.pdf").await?));
//!     println!("{:?}", uploader.trigger_upload().await);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `smart-reader` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod download;
pub mod error;
pub mod health;
pub mod notify;
pub mod observer;
pub mod placeholder;
pub mod selection;
pub mod uploader;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder};
pub use download::{DownloadSink, FileSink};
pub use error::ReaderError;
pub use health::{health_check, HealthStatus};
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use observer::{NoopObserver, ObserverHandle, UploadObserver};
pub use placeholder::Placeholder;
pub use selection::SelectedFile;
pub use uploader::{SkipReason, UploadOutcome, Uploader};

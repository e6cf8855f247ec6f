//! The uploader: one selected file, one busy flag, one request at a time.
//!
//! [`Uploader::trigger_upload`] runs the whole cycle:
//!
//! ```text
//! selected file ─▶ busy = true ─▶ multipart POST ─▶ 2xx? ─▶ body ─▶ DownloadSink
//!                                                     │
//!                                                     └─ no ─▶ Notice::Failure
//!                                  (busy = false on every path)
//! ```
//!
//! Re-entry is prevented by the busy flag rather than a lock, so a second
//! trigger while a request is in flight returns immediately with
//! [`SkipReason::Busy`] instead of queueing.

use crate::config::ClientConfig;
use crate::download::DownloadSink;
use crate::error::ReaderError;
use crate::notify::{Notice, Notifier};
use crate::observer::{NoopObserver, ObserverHandle};
use crate::selection::SelectedFile;
use reqwest::multipart::{Form, Part};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Trigger label while idle.
pub const IDLE_LABEL: &str = "Upload & Download Extracted PDF";
/// Trigger label while a request is in flight.
pub const BUSY_LABEL: &str = "Processing...";

/// Why a trigger did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoFile,
    Busy,
}

/// What a call to [`Uploader::trigger_upload`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was sent.
    Skipped(SkipReason),
    /// The processed document was delivered to the sink at this location.
    Downloaded(PathBuf),
    /// The upload failed; the message was shown to the user.
    Failed(String),
}

/// Holds the selected file and the busy flag, and runs uploads.
pub struct Uploader {
    config: ClientConfig,
    client: reqwest::Client,
    notifier: Arc<dyn Notifier>,
    sink: Arc<dyn DownloadSink>,
    observer: ObserverHandle,
    selected: Mutex<Option<SelectedFile>>,
    busy: AtomicBool,
}

impl Uploader {
    pub fn new(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
        sink: Arc<dyn DownloadSink>,
    ) -> Result<Self, ReaderError> {
        let client = config.http_client()?;
        let observer = config
            .observer
            .clone()
            .unwrap_or_else(|| Arc::new(NoopObserver) as ObserverHandle);
        Ok(Self {
            config,
            client,
            notifier,
            sink,
            observer,
            selected: Mutex::new(None),
            busy: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the held file, or clear it with `None`.
    ///
    /// Files outside the `application/pdf,image/*` hint are accepted with a
    /// warning; the service is the one that decides what it can process.
    pub fn select_file(&self, file: Option<SelectedFile>) {
        if let Some(ref f) = file {
            if !f.is_accepted() {
                warn!(
                    "'{}' has type {}, expected a PDF or an image",
                    f.name, f.mime
                );
            }
            debug!("Selected '{}' ({} bytes)", f.name, f.len());
        }
        *self.slot() = file;
    }

    /// Name of the held file, if any.
    pub fn selected_name(&self) -> Option<String> {
        self.slot().as_ref().map(|f| f.name.clone())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Whether the trigger control should be enabled.
    pub fn can_trigger(&self) -> bool {
        !self.is_busy() && self.slot().is_some()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_busy() {
            BUSY_LABEL
        } else {
            IDLE_LABEL
        }
    }

    /// Upload the held file and deliver the processed result.
    ///
    /// Does nothing when no file is selected or an upload is already running.
    /// Every failure is reported through the notifier with the same shape and
    /// also returned as [`UploadOutcome::Failed`]; none is retried.
    pub async fn trigger_upload(&self) -> UploadOutcome {
        // Clone under the lock so re-selecting mid-flight cannot affect this
        // cycle.
        let selected = self.slot().clone();
        let Some(file) = selected else {
            debug!("Trigger ignored: no file selected");
            return UploadOutcome::Skipped(SkipReason::NoFile);
        };

        let Some(_guard) = BusyGuard::acquire(&self.busy, self.observer.as_ref()) else {
            debug!("Trigger ignored: upload already in flight");
            return UploadOutcome::Skipped(SkipReason::Busy);
        };

        match self.run(file).await {
            Ok(location) => UploadOutcome::Downloaded(location),
            Err(e) => {
                let message = e.user_message();
                warn!("Upload failed: {:?}", e);
                self.observer.on_upload_failed(&message);
                self.notifier.notify(&Notice::Failure(message.clone()));
                UploadOutcome::Failed(message)
            }
        }
    }

    async fn run(&self, file: SelectedFile) -> Result<PathBuf, ReaderError> {
        let url = self.config.process_url();
        let download_name = self.config.download_filename(&file.name);
        let size = file.len();

        info!("Uploading '{}' ({} bytes) to {}", file.name, size, url);
        self.observer.on_upload_start(&file.name, size);

        let mime = file.upload_mime();
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&mime)?;
        let form = Form::new().part(self.config.field_name.clone(), part);

        let response = self.client.post(&url).multipart(form).send().await?;
        let status = response.status();
        debug!("Service answered {}", status);
        if !status.is_success() {
            return Err(ReaderError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let payload = response.bytes().await?.to_vec();
        let received = payload.len();
        let location = self.sink.deliver(&download_name, payload).await?;

        info!("Saved {} bytes to {}", received, location.display());
        self.observer.on_download_saved(&location, received);
        Ok(location)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<SelectedFile>> {
        self.selected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Holds the busy flag for the lifetime of one upload.
///
/// Clearing happens in `Drop`, so the flag is released on success, on error,
/// and if the future is dropped or panics mid-request.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    observer: &'a dyn crate::observer::UploadObserver,
}

impl<'a> BusyGuard<'a> {
    fn acquire(
        flag: &'a AtomicBool,
        observer: &'a dyn crate::observer::UploadObserver,
    ) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        observer.on_busy_changed(true);
        Some(Self { flag, observer })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.observer.on_busy_changed(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::FileSink;
    use crate::notify::RecordingNotifier;
    use crate::observer::UploadObserver;

    fn uploader(notifier: Arc<RecordingNotifier>) -> (Uploader, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        // Port 9 (discard) on loopback: nothing should ever be sent in these tests.
        let config = ClientConfig::builder()
            .endpoint("http://127.0.0.1:9")
            .build()
            .unwrap();
        let u = Uploader::new(config, notifier, Arc::new(FileSink::new(dir.path()))).unwrap();
        (u, dir)
    }

    #[tokio::test]
    async fn trigger_without_file_is_noop() {
        let n = RecordingNotifier::new();
        let (u, dir) = uploader(n.clone());

        assert_eq!(
            u.trigger_upload().await,
            UploadOutcome::Skipped(SkipReason::NoFile)
        );
        assert!(!u.is_busy());
        assert!(n.notices().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn select_replace_and_clear() {
        let (u, _dir) = uploader(RecordingNotifier::new());
        assert!(!u.can_trigger());

        u.select_file(Some(SelectedFile::new("a.pdf", "application/pdf", vec![1])));
        assert_eq!(u.selected_name().as_deref(), Some("a.pdf"));
        assert!(u.can_trigger());

        u.select_file(Some(SelectedFile::new("b.png", "image/png", vec![2])));
        assert_eq!(u.selected_name().as_deref(), Some("b.png"));

        u.select_file(None);
        assert_eq!(u.selected_name(), None);
        assert!(!u.can_trigger());
    }

    #[test]
    fn non_accepted_type_is_still_selected() {
        let (u, _dir) = uploader(RecordingNotifier::new());
        u.select_file(Some(SelectedFile::new("notes.txt", "text/plain", vec![])));
        assert_eq!(u.selected_name().as_deref(), Some("notes.txt"));
    }

    #[test]
    fn busy_guard_toggles_label_and_reports() {
        #[derive(Default)]
        struct Log(Mutex<Vec<bool>>);
        impl UploadObserver for Log {
            fn on_busy_changed(&self, busy: bool) {
                self.0.lock().unwrap().push(busy);
            }
        }

        let (u, _dir) = uploader(RecordingNotifier::new());
        let log = Log::default();
        assert_eq!(u.button_label(), IDLE_LABEL);
        {
            let guard = BusyGuard::acquire(&u.busy, &log);
            assert!(guard.is_some());
            assert_eq!(u.button_label(), BUSY_LABEL);
            assert!(BusyGuard::acquire(&u.busy, &log).is_none());
        }
        assert_eq!(u.button_label(), IDLE_LABEL);
        assert_eq!(*log.0.lock().unwrap(), vec![true, false]);
    }

    #[tokio::test]
    async fn failure_reaches_observer_before_notice_and_busy_release() {
        // Shared timeline written by both the observer and the notifier.
        #[derive(Default)]
        struct Timeline(Mutex<Vec<String>>);
        impl UploadObserver for Timeline {
            fn on_busy_changed(&self, busy: bool) {
                self.0.lock().unwrap().push(format!("busy={busy}"));
            }
            fn on_upload_failed(&self, _message: &str) {
                self.0.lock().unwrap().push("failed".into());
            }
        }
        impl Notifier for Timeline {
            fn notify(&self, _notice: &Notice) {
                self.0.lock().unwrap().push("notice".into());
            }
        }

        // Bind then release a port so the connect is refused.
        let endpoint = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            format!("http://{}", listener.local_addr().unwrap())
        };
        let timeline = Arc::new(Timeline::default());
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::builder()
            .endpoint(endpoint)
            .observer(timeline.clone() as ObserverHandle)
            .build()
            .unwrap();
        let u = Uploader::new(
            config,
            timeline.clone() as Arc<dyn Notifier>,
            Arc::new(FileSink::new(dir.path())),
        )
        .unwrap();
        u.select_file(Some(SelectedFile::new("a.pdf", "application/pdf", vec![1])));

        assert!(matches!(u.trigger_upload().await, UploadOutcome::Failed(_)));
        assert_eq!(
            *timeline.0.lock().unwrap(),
            vec!["busy=true", "failed", "notice", "busy=false"]
        );
    }

    #[test]
    fn uploader_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Uploader>();
    }
}

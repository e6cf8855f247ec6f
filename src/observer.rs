//! Observer trait for upload lifecycle events.
//!
//! Inject an [`Arc<dyn UploadObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to learn when the busy
//! flag flips and how an upload ended. A front end uses
//! [`UploadObserver::on_busy_changed`] to swap its trigger label to
//! "Processing..." and disable the control; tests use it to check that busy
//! goes true then false.
//!
//! # Example
//!
//! ```rust
//! use smart_reader::{ClientConfig, UploadObserver};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct BusyLog(Mutex<Vec<bool>>);
//!
//! impl UploadObserver for BusyLog {
//!     fn on_busy_changed(&self, busy: bool) {
//!         self.0.lock().unwrap().push(busy);
//!     }
//! }
//!
//! let log = Arc::new(BusyLog::default());
//! let config = ClientConfig::builder()
//!     .observer(log.clone() as Arc<dyn UploadObserver>)
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the uploader as an upload progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync` because an
/// [`crate::Uploader`] may be shared across tasks.
pub trait UploadObserver: Send + Sync {
    /// Busy flag changed. Fired with `true` before the request is built and
    /// with `false` once it has settled, whatever the outcome.
    fn on_busy_changed(&self, busy: bool) {
        let _ = busy;
    }

    /// The multipart request is about to be sent.
    fn on_upload_start(&self, file_name: &str, size_bytes: usize) {
        let _ = (file_name, size_bytes);
    }

    /// The processed document was handed to the download sink.
    fn on_download_saved(&self, location: &Path, size_bytes: usize) {
        let _ = (location, size_bytes);
    }

    /// The upload failed; `message` is the text shown to the user.
    fn on_upload_failed(&self, message: &str) {
        let _ = message;
    }
}

/// A no-op observer. Used when none is configured.
pub struct NoopObserver;

impl UploadObserver for NoopObserver {}

/// Convenience alias matching the type stored in [`crate::config::ClientConfig`].
pub type ObserverHandle = Arc<dyn UploadObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingObserver {
        busy: Mutex<Vec<bool>>,
        starts: AtomicUsize,
        saved: AtomicUsize,
        failures: AtomicUsize,
    }

    impl UploadObserver for TrackingObserver {
        fn on_busy_changed(&self, busy: bool) {
            self.busy.lock().unwrap().push(busy);
        }

        fn on_upload_start(&self, _file_name: &str, _size_bytes: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_download_saved(&self, _location: &Path, _size_bytes: usize) {
            self.saved.fetch_add(1, Ordering::SeqCst);
        }

        fn on_upload_failed(&self, _message: &str) {
            self.failures.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_busy_changed(true);
        o.on_upload_start("a.pdf", 3);
        o.on_download_saved(Path::new("/tmp/x.pdf"), 3);
        o.on_upload_failed("boom");
        o.on_busy_changed(false);
    }

    #[test]
    fn tracking_observer_receives_events() {
        let t = TrackingObserver::default();
        t.on_busy_changed(true);
        t.on_upload_start("a.pdf", 10);
        t.on_download_saved(Path::new("/tmp/reconstructed_a.pdf.pdf"), 20);
        t.on_busy_changed(false);

        assert_eq!(*t.busy.lock().unwrap(), vec![true, false]);
        assert_eq!(t.starts.load(Ordering::SeqCst), 1);
        assert_eq!(t.saved.load(Ordering::SeqCst), 1);
        assert_eq!(t.failures.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn arc_dyn_observer_works() {
        let o: ObserverHandle = Arc::new(NoopObserver);
        o.on_busy_changed(true);
        o.on_upload_failed("x");
    }
}

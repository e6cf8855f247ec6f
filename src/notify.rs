//! User-facing notices.
//!
//! A browser would raise a blocking alert; here the host injects a
//! [`Notifier`] and decides how to show the text (stderr, a dialog, a log
//! line, or a vector in a test).

use std::fmt;
use std::sync::{Arc, Mutex};

/// A message meant for the person driving the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An upload failed. Carries the error text or the fallback message.
    Failure(String),
    /// A placeholder action was activated.
    ComingSoon(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Failure(m) | Notice::ComingSoon(m) => m,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives notices. Implementations must not block the async runtime for
/// long; unlike a browser alert nothing waits for acknowledgement.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Forwards notices to `tracing`. Handy for headless hosts.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Failure(m) => tracing::error!("{}", m),
            Notice::ComingSoon(m) => tracing::info!("{}", m),
        }
    }
}

/// Keeps every notice in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of all notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_notifier_keeps_order() {
        let n = RecordingNotifier::new();
        n.notify(&Notice::ComingSoon("a".into()));
        n.notify(&Notice::Failure("b".into()));
        assert_eq!(
            n.notices(),
            vec![Notice::ComingSoon("a".into()), Notice::Failure("b".into())]
        );
    }

    #[test]
    fn display_is_message_only() {
        assert_eq!(Notice::Failure("Processing failed".into()).to_string(), "Processing failed");
    }
}

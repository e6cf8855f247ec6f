//! Actions that exist only as "coming soon" stubs.

use crate::notify::{Notice, Notifier};

/// An unimplemented feature exposed next to the uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    ReadAloud,
    AskThePdf,
}

impl Placeholder {
    pub const ALL: [Placeholder; 2] = [Placeholder::ReadAloud, Placeholder::AskThePdf];

    /// Control label.
    pub fn label(self) -> &'static str {
        match self {
            Placeholder::ReadAloud => "Read Aloud",
            Placeholder::AskThePdf => "Ask the PDF",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Placeholder::ReadAloud => "Read Aloud coming soon (placeholder)",
            Placeholder::AskThePdf => "Ask the PDF coming soon (placeholder)",
        }
    }

    /// Show the fixed notice. Has no other effect.
    pub fn activate(self, notifier: &dyn Notifier) {
        notifier.notify(&Notice::ComingSoon(self.message().to_string()));
    }
}

//! Hand-off to OS-level destinations outside the app.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

/// An OS-level destination the app can hand the user off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemLink {
    /// The app's own page in the OS settings.
    AppSettings,
    /// The OS notification settings for the app.
    NotificationSettings,
}

/// Opens [`SystemLink`]s. The platform shell supplies the real
/// implementation; tests use [`RecordingLinker`].
pub trait SystemLinker: Send + Debug {
    /// Hand off to the given OS destination.
    fn open(&mut self, link: SystemLink);
}

/// Records every hand-off instead of performing it.
///
/// The log is shared, so it stays observable after the linker moves into
/// a shell.
#[derive(Debug, Default)]
pub struct RecordingLinker {
    opened: Arc<Mutex<Vec<SystemLink>>>,
}

impl RecordingLinker {
    /// A linker with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle onto the shared log.
    #[must_use]
    pub fn log(&self) -> Arc<Mutex<Vec<SystemLink>>> {
        Arc::clone(&self.opened)
    }
}

impl SystemLinker for RecordingLinker {
    fn open(&mut self, link: SystemLink) {
        self.opened
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(link);
    }
}

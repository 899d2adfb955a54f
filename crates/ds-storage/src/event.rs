//! Change notification types returned by [`Storage::watch`](crate::Storage::watch).

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crate::scanner::FileKind;

/// Kind of change to a watched file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// File was created.
    Created,
    /// File was modified.
    Modified,
    /// File was removed.
    Removed,
}

impl ChangeKind {
    /// Merge a later change into an earlier one for the same path.
    ///
    /// Returns `None` when the two cancel out (created, then removed).
    #[must_use]
    pub(crate) fn merge(self, later: Self) -> Option<Self> {
        use ChangeKind::{Created, Modified, Removed};

        match (self, later) {
            (Created, Removed) => None,
            (Created | Modified, Created) | (Created, Modified) => Some(Created),
            (Modified, Modified) => Some(Modified),
            (Removed, Created) => Some(Modified),
            (Modified | Removed, Removed) | (Removed, Modified) => Some(Removed),
        }
    }
}

/// One debounced change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Change {
    /// Path relative to the content root.
    pub path: PathBuf,
    /// What happened to the file.
    pub kind: ChangeKind,
    /// What the file is to the site.
    pub file: FileKind,
}

/// Changes that settled during the same debounce window.
///
/// A consumer rebuilds once per batch rather than once per file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Changes in no particular order, one per path.
    pub changes: Vec<Change>,
}

impl ChangeBatch {
    /// True if any change touched content or category files.
    ///
    /// Asset-only batches still change the manifest, so callers that care
    /// about image hashes should check [`Self::touches_assets`] too.
    #[must_use]
    pub fn touches_content(&self) -> bool {
        self.changes
            .iter()
            .any(|c| matches!(c.file, FileKind::Content | FileKind::Category))
    }

    /// True if any change touched an image asset.
    #[must_use]
    pub fn touches_assets(&self) -> bool {
        self.changes.iter().any(|c| c.file == FileKind::Asset)
    }
}

/// Receiver for change batches.
pub struct ChangeReceiver {
    rx: mpsc::Receiver<ChangeBatch>,
}

impl ChangeReceiver {
    pub(crate) fn new(rx: mpsc::Receiver<ChangeBatch>) -> Self {
        Self { rx }
    }

    /// Wait for the next batch. Returns `None` once the watcher is gone.
    #[must_use]
    pub fn recv(&self) -> Option<ChangeBatch> {
        self.rx.recv().ok()
    }

    /// Wait up to `timeout` for the next batch.
    ///
    /// Returns `Ok(None)` on timeout and `Err(())` once the watcher is gone.
    #[allow(clippy::result_unit_err)]
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<ChangeBatch>, ()> {
        match self.rx.recv_timeout(timeout) {
            Ok(batch) => Ok(Some(batch)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(()),
        }
    }

    /// A receiver that never yields anything.
    pub(crate) fn no_op() -> Self {
        let (_tx, rx) = mpsc::channel();
        Self { rx }
    }
}

/// Stops watching when dropped.
pub struct WatchHandle {
    _shutdown: Option<mpsc::Sender<()>>,
}

impl WatchHandle {
    pub(crate) fn new(shutdown: mpsc::Sender<()>) -> Self {
        Self {
            _shutdown: Some(shutdown),
        }
    }

    /// Stop watching immediately.
    pub fn stop(mut self) {
        self._shutdown.take();
    }

    pub(crate) fn no_op() -> Self {
        Self { _shutdown: None }
    }
}

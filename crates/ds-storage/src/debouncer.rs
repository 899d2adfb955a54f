//! Coalesces bursts of filesystem events into one change per path.
//!
//! Editors commonly emit several events per save (truncate, write, rename).
//! Each path keeps a single pending change whose deadline is pushed back on
//! every new event.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::event::{Change, ChangeKind};
use crate::scanner::FileKind;

struct Pending {
    kind: ChangeKind,
    file: FileKind,
    deadline: Instant,
}

/// Thread-safe change debouncer.
pub(crate) struct Debouncer {
    pending: Mutex<HashMap<PathBuf, Pending>>,
    window: Duration,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record a raw event for a content-relative path.
    pub(crate) fn record(&self, path: PathBuf, kind: ChangeKind, file: FileKind) {
        use std::collections::hash_map::Entry;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = Instant::now() + self.window;

        match pending.entry(path) {
            Entry::Vacant(slot) => {
                slot.insert(Pending {
                    kind,
                    file,
                    deadline,
                });
            }
            Entry::Occupied(mut slot) => match slot.get().kind.merge(kind) {
                Some(merged) => {
                    let current = slot.get_mut();
                    current.kind = merged;
                    current.deadline = deadline;
                }
                None => {
                    slot.remove();
                }
            },
        }
    }

    /// Remove and return every change whose deadline has passed.
    pub(crate) fn drain_ready(&self) -> Vec<Change> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let ready: Vec<PathBuf> = pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();

        ready
            .into_iter()
            .filter_map(|path| {
                let p = pending.remove(&path)?;
                Some(Change {
                    path,
                    kind: p.kind,
                    file: p.file,
                })
            })
            .collect()
    }
}

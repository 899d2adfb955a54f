//! Filesystem storage backend.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use notify::{EventKind, RecursiveMode, Watcher};
use rayon::prelude::*;

use crate::debouncer::Debouncer;
use crate::event::{ChangeBatch, ChangeKind, ChangeReceiver, WatchHandle};
use crate::scanner::{FileKind, ScannedFile, Scanner, classify};
use crate::storage::{
    AssetFile, ScanResult, SourceFile, Storage, StorageError, StorageErrorKind, content_hash,
};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Debounce window for change notification.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// How often the drain thread checks for settled changes.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Storage backed by a local content directory.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use ds_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("content"));
/// let scan = storage.scan()?;
/// ```
pub struct FsStorage {
    root: PathBuf,
    scanner: Scanner,
}

/// A scanned file after reading.
enum Loaded {
    Source(SourceFile),
    Asset(AssetFile),
}

impl FsStorage {
    /// Create a storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            scanner: Scanner::new(root.clone()),
            root,
        }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject paths that could escape the content root.
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn load(file: ScannedFile) -> Result<Loaded, StorageError> {
        let io_err = |e| StorageError::io(e, &file.rel_path).with_backend(BACKEND);

        match file.kind {
            FileKind::Content | FileKind::Category => {
                let contents = fs::read_to_string(&file.full_path).map_err(io_err)?;
                Ok(Loaded::Source(SourceFile {
                    path: file.rel_path,
                    contents,
                }))
            }
            FileKind::Asset => {
                let bytes = fs::read(&file.full_path).map_err(io_err)?;
                Ok(Loaded::Asset(AssetFile {
                    path: file.rel_path,
                    hash: content_hash(&bytes),
                }))
            }
        }
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<ScanResult, StorageError> {
        let start = Instant::now();

        let files = self
            .scanner
            .scan()
            .map_err(|e| StorageError::io(e, &self.root).with_backend(BACKEND))?;

        // Order-preserving: collect keeps input order.
        let loaded = files
            .into_par_iter()
            .map(Self::load)
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = ScanResult::default();
        for item in loaded {
            match item {
                Loaded::Source(source) => result.sources.push(source),
                Loaded::Asset(asset) => result.assets.push(asset),
            }
        }

        tracing::debug!(
            root = %self.root.display(),
            sources = result.sources.len(),
            assets = result.assets.len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Content directory scanned"
        );

        Ok(result)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        Self::validate_path(path)?;
        fs::read(self.root.join(path))
            .map_err(|e| StorageError::io(e, path).with_backend(BACKEND))
    }

    fn watch(&self) -> Result<(ChangeReceiver, WatchHandle), StorageError> {
        let (batch_tx, batch_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let debouncer = Arc::new(Debouncer::new(DEBOUNCE));

        let root = self.root.clone();
        let watcher_debouncer = Arc::clone(&debouncer);
        let mut watcher =
            notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                let Ok(event) = res else {
                    return;
                };
                let kind = match event.kind {
                    EventKind::Create(_) => ChangeKind::Created,
                    EventKind::Modify(_) => ChangeKind::Modified,
                    EventKind::Remove(_) => ChangeKind::Removed,
                    _ => return,
                };
                for path in event.paths {
                    let Ok(rel_path) = path.strip_prefix(&root) else {
                        continue;
                    };
                    if let Some(file) = classify(rel_path) {
                        watcher_debouncer.record(rel_path.to_path_buf(), kind, file);
                    }
                }
            })
            .map_err(|e| {
                StorageError::new(StorageErrorKind::WatchFailed)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| {
                StorageError::new(StorageErrorKind::WatchFailed)
                    .with_backend(BACKEND)
                    .with_path(&self.root)
                    .with_source(e)
            })?;

        // The watcher moves into the drain thread so it lives as long as the handle.
        std::thread::spawn(move || {
            let _watcher = watcher;

            loop {
                match shutdown_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {}
                }

                let changes = debouncer.drain_ready();
                if changes.is_empty() {
                    continue;
                }
                tracing::debug!(changes = changes.len(), "Content changes settled");
                if batch_tx.send(ChangeBatch { changes }).is_err() {
                    break;
                }
            }
        });

        Ok((ChangeReceiver::new(batch_rx), WatchHandle::new(shutdown_tx)))
    }
}

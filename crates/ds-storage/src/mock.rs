//! In-memory storage for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, mpsc};

use crate::event::{Change, ChangeBatch, ChangeKind, ChangeReceiver, WatchHandle};
use crate::scanner::{FileKind, classify};
use crate::storage::{
    AssetFile, ScanResult, SourceFile, Storage, StorageError, StorageErrorKind, content_hash,
};

/// Mock storage for testing.
///
/// Files are returned by [`Storage::scan`] in insertion order, which stands
/// in for directory-scan order.
///
/// # Example
///
/// ```ignore
/// use ds_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_source("doc-cloud/index.mdx", "---\ntitle: Cloud\n---\n")
///     .with_asset("doc-cloud/img/logo.png", b"png");
///
/// let scan = storage.scan().unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    sources: RwLock<Vec<SourceFile>>,
    assets: RwLock<Vec<AssetFile>>,
    bytes: RwLock<HashMap<PathBuf, Vec<u8>>>,
    sender: RwLock<Option<mpsc::Sender<ChangeBatch>>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content or category file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_source(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.put_source(path, contents);
        self
    }

    /// Add an image asset.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_asset(self, path: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let path = path.into();
        self.assets.write().unwrap().push(AssetFile {
            path: path.clone(),
            hash: content_hash(bytes),
        });
        self.bytes.write().unwrap().insert(path, bytes.to_vec());
        self
    }

    /// Add or replace a content file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn put_source(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let file = SourceFile::new(path, contents);
        let mut sources = self.sources.write().unwrap();
        match sources.iter_mut().find(|s| s.path == file.path) {
            Some(existing) => *existing = file,
            None => sources.push(file),
        }
    }

    /// Remove a content file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_source(&self, path: &Path) {
        self.sources.write().unwrap().retain(|s| s.path != path);
    }

    /// Send a single-change batch to the current watcher, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn emit(&self, path: impl Into<PathBuf>, kind: ChangeKind) {
        let path = path.into();
        let file = classify(&path).unwrap_or(FileKind::Content);
        if let Some(sender) = self.sender.read().unwrap().as_ref() {
            let _ = sender.send(ChangeBatch {
                changes: vec![Change { path, kind, file }],
            });
        }
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<ScanResult, StorageError> {
        Ok(ScanResult {
            sources: self.sources.read().unwrap().clone(),
            assets: self.assets.read().unwrap().clone(),
        })
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        if let Some(bytes) = self.bytes.read().unwrap().get(path) {
            return Ok(bytes.clone());
        }
        self.sources
            .read()
            .unwrap()
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.contents.clone().into_bytes())
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::NotFound)
                    .with_path(path)
                    .with_backend("Mock")
            })
    }

    fn watch(&self) -> Result<(ChangeReceiver, WatchHandle), StorageError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.write().unwrap() = Some(tx);
        Ok((ChangeReceiver::new(rx), WatchHandle::no_op()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_storage_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_new_empty() {
        let scan = MockStorage::new().scan().unwrap();

        assert!(scan.sources.is_empty());
        assert!(scan.assets.is_empty());
    }

    #[test]
    fn test_scan_keeps_insertion_order() {
        let storage = MockStorage::new()
            .with_source("doc-cloud/b.mdx", "b")
            .with_source("doc-cloud/a.mdx", "a");

        let scan = storage.scan().unwrap();

        assert_eq!(scan.sources[0].path, PathBuf::from("doc-cloud/b.mdx"));
        assert_eq!(scan.sources[1].path, PathBuf::from("doc-cloud/a.mdx"));
    }

    #[test]
    fn test_put_source_replaces_in_place() {
        let storage = MockStorage::new()
            .with_source("doc-cloud/a.mdx", "old")
            .with_source("doc-cloud/b.mdx", "b");

        storage.put_source("doc-cloud/a.mdx", "new");
        let scan = storage.scan().unwrap();

        assert_eq!(scan.sources.len(), 2);
        assert_eq!(scan.sources[0].contents, "new");
    }

    #[test]
    fn test_remove_source() {
        let storage = MockStorage::new().with_source("doc-cloud/a.mdx", "a");

        storage.remove_source(Path::new("doc-cloud/a.mdx"));

        assert!(storage.scan().unwrap().sources.is_empty());
    }

    #[test]
    fn test_with_asset_hashes_and_reads() {
        let storage = MockStorage::new().with_asset("doc-cloud/img/a.png", b"png");

        let scan = storage.scan().unwrap();

        assert_eq!(scan.assets[0].hash, content_hash(b"png"));
        assert_eq!(storage.read(Path::new("doc-cloud/img/a.png")).unwrap(), b"png");
    }

    #[test]
    fn test_read_missing() {
        let err = MockStorage::new()
            .read(Path::new("missing.png"))
            .unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_emit_after_watch() {
        let storage = MockStorage::new();
        let (rx, _handle) = storage.watch().unwrap();

        storage.emit("doc-cloud/_category_.json", ChangeKind::Modified);
        let batch = rx.recv().unwrap();

        assert_eq!(batch.changes.len(), 1);
        assert_eq!(batch.changes[0].file, FileKind::Category);
    }

    #[test]
    fn test_emit_without_watch_is_noop() {
        let storage = MockStorage::new();

        storage.emit("doc-cloud/a.mdx", ChangeKind::Modified);
    }
}

//! Live reload manager.
//!
//! Rebuilds the site on every debounced change batch from storage and
//! broadcasts a reload event once the new snapshot is in place.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use ds_site::Site;
use ds_storage::{ChangeBatch, Storage, StorageError, WatchHandle};
use serde::Serialize;
use tokio::sync::broadcast;

/// Event sent to connected WebSocket clients after a rebuild.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ReloadEvent {
    /// Event type (always "reload").
    #[serde(rename = "type")]
    event_type: String,
    /// Changed files, relative to the content root.
    paths: Vec<PathBuf>,
}

/// Owns the storage watch and the broadcast channel.
pub(crate) struct LiveReloadManager {
    broadcaster: broadcast::Sender<ReloadEvent>,
    watch: Option<WatchHandle>,
}

impl LiveReloadManager {
    #[must_use]
    pub(crate) fn new(broadcaster: broadcast::Sender<ReloadEvent>) -> Self {
        Self {
            broadcaster,
            watch: None,
        }
    }

    /// Start watching `storage` and rebuilding `site` on changes.
    ///
    /// Rebuilds run on a dedicated thread; watching stops when the manager
    /// is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be watched.
    pub(crate) fn start(&mut self, site: Arc<Site>, storage: &dyn Storage) -> Result<(), StorageError> {
        let (changes, handle) = storage.watch()?;
        self.watch = Some(handle);

        let broadcaster = self.broadcaster.clone();
        thread::spawn(move || {
            while let Some(batch) = changes.recv() {
                Self::handle_batch(&batch, &site, &broadcaster);
            }
            tracing::debug!("Change stream closed, live reload stopped");
        });

        tracing::info!("Live reload started");
        Ok(())
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.broadcaster.subscribe()
    }

    fn handle_batch(batch: &ChangeBatch, site: &Site, broadcaster: &broadcast::Sender<ReloadEvent>) {
        if !batch.touches_content() && !batch.touches_assets() {
            return;
        }

        // A failed rebuild keeps the previous snapshot; browsers stay put.
        if site.rebuild().is_err() {
            return;
        }

        let paths: Vec<PathBuf> = batch.changes.iter().map(|c| c.path.clone()).collect();
        tracing::info!(changes = paths.len(), "Live reload event processed");
        // No receivers just means no browser is connected.
        let _ = broadcaster.send(ReloadEvent {
            event_type: "reload".to_owned(),
            paths,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ds_site::SiteSettings;
    use ds_storage::{ChangeKind, MockStorage};

    use super::*;

    fn setup() -> (Arc<MockStorage>, Arc<Site>, LiveReloadManager) {
        let storage = Arc::new(MockStorage::new().with_source("doc-cloud/index.md", "# Cloud\n"));
        let site = Arc::new(
            Site::load(
                Arc::clone(&storage) as Arc<dyn Storage>,
                SiteSettings::default(),
            )
            .unwrap(),
        );
        let (tx, _rx) = broadcast::channel(16);
        let mut manager = LiveReloadManager::new(tx);
        manager.start(Arc::clone(&site), storage.as_ref()).unwrap();
        (storage, site, manager)
    }

    #[tokio::test]
    async fn test_change_rebuilds_and_broadcasts() {
        let (storage, site, manager) = setup();
        let mut events = manager.subscribe();

        storage.put_source("doc-cloud/billing.md", "# Billing\n");
        storage.emit("doc-cloud/billing.md", ChangeKind::Created);

        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event_type, "reload");
        assert_eq!(event.paths, vec![PathBuf::from("doc-cloud/billing.md")]);
        assert_eq!(site.snapshot().index().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_rebuild_is_not_broadcast() {
        let (storage, site, manager) = setup();
        let mut events = manager.subscribe();

        storage.put_source("doc-cloud/broken.md", "---\ntitle: [\n---\n");
        storage.emit("doc-cloud/broken.md", ChangeKind::Created);

        let result = tokio::time::timeout(Duration::from_millis(500), events.recv()).await;
        assert!(result.is_err());
        assert_eq!(site.snapshot().index().len(), 1);
    }

    #[test]
    fn test_reload_event_serialization() {
        let event = ReloadEvent {
            event_type: "reload".to_owned(),
            paths: vec![PathBuf::from("doc-cloud/index.md")],
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "reload");
        assert_eq!(json["paths"][0], "doc-cloud/index.md");
    }
}

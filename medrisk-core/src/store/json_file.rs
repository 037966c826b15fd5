//! JSON document store with a polling refresh feed.
//!
//! The whole collection lives in one pretty-printed JSON document. Writes
//! go to a `.tmp` sibling first and are renamed into place, so a reader
//! never sees a half-written file. A missing file is an empty collection.

use super::{DatasetFeed, DatasetStore, Snapshot, stamp};
use crate::dataset::{Dataset, NewDataset};
use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    datasets: Vec<Dataset>,
}

/// File-backed dataset store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    tx: watch::Sender<Snapshot>,
}

impl JsonFileStore {
    /// Open the store at `path`, reading the current collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let datasets = load_datasets(&path)?;
        debug!(path = %path.display(), datasets = datasets.len(), "Opened dataset store");
        let (tx, _rx) = watch::channel(Arc::new(datasets));
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
            tx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the document and publish it if it differs from the last
    /// snapshot. Returns whether a new snapshot was published.
    pub fn refresh(&self) -> Result<bool> {
        let datasets = load_datasets(&self.path)?;
        let changed = self.tx.send_if_modified(|snapshot| {
            if **snapshot == datasets {
                false
            } else {
                *snapshot = Arc::new(datasets);
                true
            }
        });
        if changed {
            debug!(path = %self.path.display(), "Dataset store changed on disk");
        }
        Ok(changed)
    }

    /// Start a background task that calls [`refresh`](Self::refresh) every
    /// `interval`. Read failures are logged and retried on the next tick.
    pub fn spawn_poller(self: &Arc<Self>, interval: Duration) -> Poller {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let store = Arc::clone(self);
        let handle = tokio::spawn(poll_loop(store, interval, cancel_rx));
        info!(
            path = %self.path.display(),
            interval_ms = interval.as_millis() as u64,
            "Dataset poller started"
        );
        Poller { cancel_tx, handle }
    }
}

async fn poll_loop(
    store: Arc<JsonFileStore>,
    interval: Duration,
    mut cancel_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; the store was just read.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = store.refresh() {
                    warn!(error = %e, "Dataset poller: failed to read store");
                }
            }
            _ = cancel_rx.changed() => {
                debug!("Dataset poller cancelled");
                break;
            }
        }
    }
}

/// Handle to a running poller.
#[derive(Debug)]
pub struct Poller {
    cancel_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Poller {
    /// Stop polling and wait for the task to finish.
    pub async fn stop(self) {
        let _ = self.cancel_tx.send(true);
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
        info!("Dataset poller stopped");
    }
}

impl DatasetStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Dataset>> {
        load_datasets(&self.path)
    }

    fn get(&self, id: &str) -> Result<Option<Dataset>> {
        Ok(load_datasets(&self.path)?.into_iter().find(|d| d.id == id))
    }

    fn create(&self, new: NewDataset) -> Result<Dataset> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut datasets = load_datasets(&self.path)?;
        let dataset = stamp(new);
        datasets.push(dataset.clone());
        write_datasets(&self.path, &datasets)?;
        self.tx.send_replace(Arc::new(datasets));
        info!(id = %dataset.id, name = %dataset.name, "Created dataset");
        Ok(dataset)
    }

    fn subscribe(&self) -> DatasetFeed {
        DatasetFeed::new(self.tx.subscribe())
    }
}

fn load_datasets(path: &Path) -> Result<Vec<Dataset>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if data.trim().is_empty() {
        return Ok(Vec::new());
    }
    let doc: StoreDocument = serde_json::from_str(&data).map_err(|e| StoreError::Corrupt {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(doc.datasets)
}

fn write_datasets(path: &Path, datasets: &[Dataset]) -> Result<()> {
    let doc = StoreDocument {
        datasets: datasets.to_vec(),
    };
    let json = serde_json::to_string_pretty(&doc)?;
    atomic_write(path, json.as_bytes()).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MedRiskError;
    use tempfile::TempDir;

    fn submission(name: &str) -> NewDataset {
        NewDataset {
            name: name.into(),
            source: "https://example.org".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("datasets.json")).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.subscribe().current().is_empty());
    }

    #[test]
    fn test_create_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("datasets.json");
        let created = {
            let store = JsonFileStore::open(&path).unwrap();
            store.create(submission("A")).unwrap()
        };
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        let fetched = reopened.get(&created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_corrupt_document_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datasets.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, MedRiskError::Store(StoreError::Corrupt { .. })));
    }

    #[test]
    fn test_refresh_publishes_only_on_change() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datasets.json");
        let store = JsonFileStore::open(&path).unwrap();
        assert!(!store.refresh().unwrap());

        // Another process appends a record.
        let other = JsonFileStore::open(&path).unwrap();
        other.create(submission("External")).unwrap();

        assert!(store.refresh().unwrap());
        assert_eq!(store.subscribe().current().len(), 1);
        assert!(!store.refresh().unwrap());
    }

    #[tokio::test]
    async fn test_poller_picks_up_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("datasets.json");
        let store = Arc::new(JsonFileStore::open(&path).unwrap());
        let mut feed = store.subscribe();
        let poller = store.spawn_poller(Duration::from_millis(20));

        JsonFileStore::open(&path)
            .unwrap()
            .create(submission("External"))
            .unwrap();

        let snapshot = tokio::time::timeout(Duration::from_secs(2), feed.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot[0].name, "External");
        poller.stop().await;
    }
}

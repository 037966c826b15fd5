//! In-process store. Every `create` pushes a new snapshot to subscribers.

use super::{DatasetFeed, DatasetStore, Snapshot, stamp};
use crate::dataset::{Dataset, NewDataset};
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::watch;

/// Dataset store held entirely in memory.
///
/// The watch channel's current value *is* the collection, so readers and
/// subscribers can never disagree.
#[derive(Debug)]
pub struct MemoryStore {
    tx: watch::Sender<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_datasets(Vec::new())
    }

    /// Seed the store with existing records, kept as-is.
    pub fn with_datasets(datasets: Vec<Dataset>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(datasets));
        Self { tx }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore for MemoryStore {
    fn list(&self) -> Result<Vec<Dataset>> {
        Ok(self.tx.borrow().to_vec())
    }

    fn get(&self, id: &str) -> Result<Option<Dataset>> {
        Ok(self.tx.borrow().iter().find(|d| d.id == id).cloned())
    }

    fn create(&self, new: NewDataset) -> Result<Dataset> {
        let dataset = stamp(new);
        self.tx.send_modify(|snapshot| {
            Arc::make_mut(snapshot).push(dataset.clone());
        });
        tracing::info!(id = %dataset.id, name = %dataset.name, "Created dataset");
        Ok(dataset)
    }

    fn subscribe(&self) -> DatasetFeed {
        DatasetFeed::new(self.tx.subscribe())
    }
}

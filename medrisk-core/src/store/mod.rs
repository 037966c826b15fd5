//! Dataset persistence and the live snapshot feed.
//!
//! The store is append-only: datasets are listed, fetched by id, and
//! created, never updated or deleted. Consumers that want live updates
//! subscribe to a [`DatasetFeed`], which always carries the *whole*
//! collection. A newer snapshot replaces the older one outright.

pub mod json_file;
pub mod memory;

pub use json_file::{JsonFileStore, Poller};
pub use memory::MemoryStore;

use crate::catalog::Catalog;
use crate::dataset::{Dataset, NewDataset};
use crate::error::{Result, ValidationError};
use crate::form::check_required;
use crate::report::{DatasetSummary, summarize};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// A full, immutable copy of the dataset collection.
pub type Snapshot = Arc<Vec<Dataset>>;

/// Append-only dataset store.
pub trait DatasetStore: Send + Sync {
    /// Full collection in creation order.
    fn list(&self) -> Result<Vec<Dataset>>;

    /// Single-document fetch.
    fn get(&self, id: &str) -> Result<Option<Dataset>>;

    /// Persist a new dataset, assigning its id and creation time.
    fn create(&self, new: NewDataset) -> Result<Dataset>;

    /// Live feed of full-collection snapshots.
    fn subscribe(&self) -> DatasetFeed;
}

/// Assign store identity to a submission.
pub(crate) fn stamp(new: NewDataset) -> Dataset {
    Dataset::from_new(new, uuid::Uuid::new_v4().to_string(), Utc::now())
}

/// Receiving end of the snapshot feed.
///
/// Intermediate snapshots may be skipped; only the latest one is ever
/// observable.
#[derive(Debug, Clone)]
pub struct DatasetFeed {
    rx: watch::Receiver<Snapshot>,
}

impl DatasetFeed {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self { rx }
    }

    /// The latest snapshot.
    pub fn current(&self) -> Snapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the store is gone.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Re-score the whole current snapshot.
    pub fn scored(&self, catalog: &Catalog) -> Vec<DatasetSummary> {
        let snapshot = self.current();
        tracing::debug!(datasets = snapshot.len(), "Re-scoring snapshot");
        summarize(&snapshot, catalog)
    }
}

/// Shape of an exported collection: either a bare array or an object
/// with a `datasets` array.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ExportDocument {
    Wrapped { datasets: Vec<Dataset> },
    Bare(Vec<Dataset>),
}

/// Parse an exported dataset collection.
pub fn parse_export(source: &str) -> Result<Vec<Dataset>> {
    let doc: ExportDocument = serde_json::from_str(source)?;
    Ok(match doc {
        ExportDocument::Wrapped { datasets } | ExportDocument::Bare(datasets) => datasets,
    })
}

/// Append every exported dataset to the store as a new record.
///
/// Every record must carry a name and a web source link; the whole import
/// is rejected before anything is written if one does not. Missing
/// checklist rows are seeded blank. Exported ids and timestamps are
/// discarded; the store assigns fresh ones.
pub fn import_into<S: DatasetStore + ?Sized>(
    store: &S,
    catalog: &Catalog,
    datasets: Vec<Dataset>,
) -> Result<Vec<Dataset>> {
    let mut submissions = Vec::with_capacity(datasets.len());
    for (index, dataset) in datasets.into_iter().enumerate() {
        let mut new = dataset.into_new();
        check_required(&new.name, &new.source).map_err(|reason| {
            ValidationError::ImportRecord {
                index,
                reason: Box::new(reason),
            }
        })?;
        new.name = new.name.trim().to_string();
        new.source = new.source.trim().to_string();
        new.description = new.description.trim().to_string();
        new.seed_rows(catalog);
        submissions.push(new);
    }

    let mut created = Vec::with_capacity(submissions.len());
    for new in submissions {
        created.push(store.create(new)?);
    }
    tracing::info!(count = created.len(), "Imported datasets");
    Ok(created)
}

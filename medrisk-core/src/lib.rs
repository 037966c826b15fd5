//! MedRisk Core: risk assessment for medical imaging datasets.
//!
//! A static checklist catalog, a filter that decides which checklist rows
//! apply to a dataset, and a reducer that turns answered rows into a score
//! and a Low/Medium/High band. Around that sit the dataset model, the
//! add-dataset form, an append-only store with a snapshot feed, report
//! rendering, and layered configuration.
//!
//! - [`catalog`]: checklist items and the built-in catalog
//! - [`applicability`]: which rows apply to a declared scope
//! - [`scoring`]: score reducer and band classifier
//! - [`form`]: add-dataset form state and validation
//! - [`store`]: dataset persistence and live snapshots
//! - [`report`]: list view and per-dataset risk cards

pub mod applicability;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod form;
pub mod report;
pub mod scoring;
pub mod store;

// Re-exports for convenience
pub use applicability::{DeclaredScope, Scope, applicable_items, is_applicable};
pub use catalog::{AnswerKind, Catalog, ChecklistItem, Modality, Region, Severity};
pub use config::{ConfigOverrides, MedRiskConfig, load_config};
pub use dataset::{Dataset, NewDataset, RiskAnswer};
pub use error::{
    CatalogError, ConfigError, MedRiskError, Result, StoreError, ValidationError,
};
pub use form::{DatasetDraft, check_required, check_source};
pub use report::{DatasetReport, DatasetSummary, RenderOptions, ReportFormat, summarize};
pub use scoring::{
    AnswerSheet, RiskAssessment, RiskBand, RowAssessment, assess, assess_row, band, compute_score,
};
pub use store::{DatasetFeed, DatasetStore, JsonFileStore, MemoryStore, Snapshot};

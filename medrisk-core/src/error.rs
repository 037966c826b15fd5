//! Error types for the MedRisk core library.
//!
//! Uses `thiserror` for public API error types. The scoring functions in
//! [`crate::scoring`] and [`crate::applicability`] never fail; errors only
//! come from catalog construction, form validation, storage, and config.

use std::path::PathBuf;

/// Top-level error type for the MedRisk core library.
#[derive(Debug, thiserror::Error)]
pub enum MedRiskError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from building or loading a checklist catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate checklist item id: {id}")]
    DuplicateId { id: String },

    #[error("Unknown checklist item: {id}")]
    UnknownItem { id: String },

    #[error("Failed to parse catalog {format}: {message}")]
    Parse { format: String, message: String },
}

/// Errors raised when a dataset submission is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid source URL '{value}': {reason}")]
    InvalidSource { value: String, reason: String },

    #[error("Answer '{answer}' is not a valid option for '{item_id}' (expected one of: {options})")]
    InvalidAnswer {
        item_id: String,
        answer: String,
        options: String,
    },

    #[error("'{label}' is not a recommended mitigation for '{item_id}'")]
    UnknownMitigation { item_id: String, label: String },

    #[error("Unknown checklist item: {id}")]
    UnknownItem { id: String },

    #[error("Checklist row '{item_id}' applies to this dataset but has no answer")]
    UnansweredRow { item_id: String },

    #[error("Import record {index} rejected: {reason}")]
    ImportRecord {
        index: usize,
        reason: Box<ValidationError>,
    },
}

/// Errors from the dataset store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Dataset not found: {id}")]
    NotFound { id: String },

    #[error("Store document {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] Box<figment::Error>),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MedRiskError>;

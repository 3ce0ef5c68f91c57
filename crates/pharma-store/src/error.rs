//! # Store Error Types
//!
//! Error types for data directory operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the file path and categorization       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in apps/server) ← Serialized for the dashboard               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A unique field is already taken.
    ///
    /// ## When This Occurs
    /// - Inserting a product with a barcode another product has
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Reading, writing or renaming a collection file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection file exists but is not a JSON array of the expected
    /// records. The file is left untouched.
    #[error("Corrupt collection file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing records for writing failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

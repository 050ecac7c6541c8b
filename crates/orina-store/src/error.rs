//! # Store Error Types
//!
//! Error types for document operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the path and categorization           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppController: save failure → logged, state kept                      │
//! │  Import command: invalid snapshot → ApiError shown to operator         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Loading never returns an error for bad content: an unreadable document
//! falls back to the seed state.

use std::path::PathBuf;
use thiserror::Error;

/// Document operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the file failed.
    ///
    /// ## When This Occurs
    /// - Directory missing and cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state could not be turned into JSON (or JSON into text).
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An import was rejected before touching the state.
    ///
    /// ## When This Occurs
    /// - Not valid JSON
    /// - No `currentUser` key
    /// - `products` missing, null, false, 0 or empty string
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl StoreError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        StoreError::InvalidSnapshot(reason.into())
    }
}

/// Result type for document operations.
pub type StoreResult<T> = Result<T, StoreError>;

//! # State Store
//!
//! Loads and saves the one JSON document.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Document Lifecycle                                 │
//! │                                                                         │
//! │  StoreConfig::new(path) ← Configure location and formatting            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StateStore::load(now)                                                 │
//! │       ├── file missing      ──► seed_state(now)                        │
//! │       ├── not valid JSON    ──► seed_state(now)   (warn)               │
//! │       └── parsed            ──► migrations::sanitize                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AppController works on the tree                                       │
//! │       │                                                                 │
//! │       ▼ after every accepted change                                     │
//! │  StateStore::save(&state)                                              │
//! │       └── write <path>.tmp ──► rename over <path>                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Whole-Document Writes
//! Every save rewrites the entire file. The rename means a crash mid-write
//! leaves the previous document intact rather than a truncated one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use orina_core::AppState;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::seed;

/// Default document file name.
pub const STATE_FILE_NAME: &str = "orina_state.json";

// =============================================================================
// Configuration
// =============================================================================

/// Store configuration.
///
/// ## Example
/// ```rust
/// use orina_store::StoreConfig;
///
/// let config = StoreConfig::new("./data/orina_state.json").pretty(true);
/// assert!(config.pretty);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the JSON document.
    pub path: PathBuf,

    /// Indent the JSON on save.
    /// Default: false (compact, like the document has always been)
    pub pretty: bool,

    /// Create missing parent directories on save.
    /// Default: true
    pub create_dirs: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            pretty: false,
            create_dirs: true,
        }
    }

    /// Sets whether to indent the saved JSON.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets whether to create missing parent directories.
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

/// Handle on the document file.
#[derive(Debug, Clone)]
pub struct StateStore {
    config: StoreConfig,
}

impl StateStore {
    pub fn new(config: StoreConfig) -> Self {
        StateStore { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn exists(&self) -> bool {
        self.config.path.exists()
    }

    /// Reads the document, sanitizing it, or seeds a fresh state.
    ///
    /// Never fails: a missing, unreadable or unparsable document yields the
    /// seed state.
    pub fn load(&self, now: DateTime<Utc>) -> AppState {
        let path = &self.config.path;

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No saved document, starting from seed data");
                return seed::seed_state(now);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read document, starting from seed data");
                return seed::seed_state(now);
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(doc) => {
                let state = migrations::sanitize(&doc);
                info!(
                    path = %path.display(),
                    products = state.products.len(),
                    transactions = state.transactions.len(),
                    "Loaded document"
                );
                state
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Document is not valid JSON, starting from seed data");
                seed::seed_state(now)
            }
        }
    }

    /// Overwrites the document with `state`.
    ///
    /// ## Errors
    /// `StoreError::Io` when the directory or file cannot be written.
    pub fn save(&self, state: &AppState) -> StoreResult<()> {
        let path = &self.config.path;

        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(state)?
        } else {
            serde_json::to_vec(state)?
        };

        if self.config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let tmp = temp_path(path);
        fs::write(&tmp, &bytes).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

        debug!(path = %path.display(), bytes = bytes.len(), "Saved document");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| STATE_FILE_NAME.into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orina_core::{Command, ProductDraft, ProductKind};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_seeds() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(StoreConfig::new(dir.path().join(STATE_FILE_NAME)));

        assert!(!store.exists());
        let state = store.load(Utc::now());
        assert_eq!(state.products.len(), 36);
    }

    #[test]
    fn test_garbage_file_seeds() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        let state = StateStore::new(StoreConfig::new(&path)).load(Utc::now());
        assert_eq!(state.formulations.len(), 1);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(StoreConfig::new(dir.path().join("nested/state.json")).pretty(true));

        let now = Utc::now();
        let state = seed::seed_state(now).apply(
            Command::AddProduct(ProductDraft::new(ProductKind::RawMaterial)),
            now,
        );
        store.save(&state).unwrap();

        assert!(store.exists());
        assert!(!temp_path(store.path()).exists());
        assert_eq!(store.load(now), state);
    }

    #[test]
    fn test_present_document_without_products_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(STATE_FILE_NAME);
        fs::write(&path, r#"{"settings": {"brandName": "Kiran Foods"}}"#).unwrap();

        let state = StateStore::new(StoreConfig::new(&path)).load(Utc::now());
        assert!(state.products.is_empty());
        assert_eq!(state.settings.brand_name, "Kiran Foods");
    }

    #[test]
    fn test_save_into_missing_dir_without_create_fails() {
        let dir = tempdir().unwrap();
        let store = StateStore::new(
            StoreConfig::new(dir.path().join("absent/state.json")).create_dirs(false),
        );
        assert!(matches!(
            store.save(&AppState::default()),
            Err(StoreError::Io { .. })
        ));
    }
}

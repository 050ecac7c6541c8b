//! # orina-store: Persistence Adapter for Orina Operations
//!
//! This crate keeps the whole application state in one local JSON document.
//! There is no server and no database: the document is the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Orina Operations Data Flow                         │
//! │                                                                         │
//! │  AppController (console)                                               │
//! │       │  load once at startup, save after every accepted change        │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   orina-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌───────────────┐  ┌───────────────┐      │   │
//! │  │   │  StateStore   │  │  migrations   │  │   snapshot    │      │   │
//! │  │   │  (store.rs)   │  │  sanitize()   │  │ export/import │      │   │
//! │  │   │  load / save  │─►│  coerce_*()   │◄─│ backup files  │      │   │
//! │  │   └───────────────┘  └───────────────┘  └───────────────┘      │   │
//! │  │            │                                                    │   │
//! │  │            └──► seed.rs (fresh install)                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 orina_state.json                                │   │
//! │  │   ~/.local/share/orina/orina_state.json (platform data dir)     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - Document load/save and configuration
//! - [`migrations`] - Field-by-field sanitization of stored data
//! - [`seed`] - Default state for a fresh install
//! - [`snapshot`] - Backup export and import
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use orina_store::{StateStore, StoreConfig};
//!
//! let store = StateStore::new(StoreConfig::new("./orina_state.json"));
//! let state = store.load(Utc::now());
//! store.save(&state)?;
//! # Ok::<(), orina_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod seed;
pub mod snapshot;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use seed::seed_state;
pub use snapshot::{backup_file_name, export_snapshot, import_file, import_snapshot, write_backup};
pub use store::{StateStore, StoreConfig, STATE_FILE_NAME};

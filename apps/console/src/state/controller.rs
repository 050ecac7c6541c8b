//! # Application Controller
//!
//! Owns the authoritative state tree and the store it is saved to.
//!
//! ## Dispatch
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    AppController::dispatch                              │
//! │                                                                         │
//! │  Command::RecordSale(tx)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  next = self.state.apply(command, now)   ◄── pure, never fails         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  self.state = next                       ◄── one assignment            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.save(&self.state)                                               │
//! │       ├── Ok  ──► debug!                                                │
//! │       └── Err ──► error!, memory keeps the new tree                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Readers never see a half-applied change: the old tree is untouched
//! until `apply` returns and the new one replaces it whole.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use orina_core::{AppState, Command};
use orina_store::{StateStore, StoreResult};

/// The state tree plus the store that persists it.
#[derive(Debug)]
pub struct AppController {
    store: StateStore,
    state: AppState,
    operator: Option<String>,
}

impl AppController {
    /// Loads (or seeds) the document behind `store`.
    pub fn open(store: StateStore, now: DateTime<Utc>) -> Self {
        let state = store.load(now);
        info!(
            path = %store.path().display(),
            products = state.products.len(),
            "Controller opened"
        );
        AppController {
            store,
            state,
            operator: None,
        }
    }

    /// Wraps an already-built tree. Nothing is read from disk.
    pub fn with_state(store: StateStore, state: AppState) -> Self {
        AppController {
            store,
            state,
            operator: None,
        }
    }

    /// Sets the name written as `recordedBy` on new sales.
    pub fn with_operator(mut self, operator: Option<String>) -> Self {
        self.operator = operator.filter(|o| !o.trim().is_empty());
        self
    }

    /// The current published tree.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Name to stamp on a sale: the configured operator, else the stored
    /// identity.
    pub fn recorded_by(&self) -> &str {
        self.operator
            .as_deref()
            .unwrap_or(self.state.current_user.name.as_str())
    }

    /// Applies `command`, publishes the result and saves it.
    ///
    /// Returns the outcome of the save. The new tree is published either
    /// way; a failed save is logged and the caller may ignore it.
    pub fn dispatch(&mut self, command: Command, now: DateTime<Utc>) -> StoreResult<()> {
        let name = command.name();
        debug!(command = name, "Dispatching");

        let next = self.state.apply(command, now);
        self.state = next;

        match self.store.save(&self.state) {
            Ok(()) => {
                debug!(command = name, "State published and saved");
                Ok(())
            }
            Err(e) => {
                error!(command = name, error = %e, "Failed to save state, keeping in-memory changes");
                Err(e)
            }
        }
    }

    /// Writes the current tree without changing it.
    pub fn flush(&self) -> StoreResult<()> {
        self.store.save(&self.state)
    }
}

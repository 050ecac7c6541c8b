//! # Backup Commands
//!
//! Whole-document export and import.
//!
//! ## Import
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Snapshot Import                                      │
//! │                                                                         │
//! │  orina backup import orina_backup_2024-03-15.json                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  import_file(path)                                                     │
//! │       ├── unreadable / not JSON / no currentUser / no products         │
//! │       │        └──► INVALID_SNAPSHOT, current state untouched          │
//! │       └── ok ──► sanitized AppState (identity forced)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Command::ReplaceState ──► whole tree replaced and saved               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::commands::submit;
use crate::error::ApiError;
use crate::state::AppController;
use orina_core::{AppState, Command};
use orina_store::{import_file, write_backup};

/// Counts reported after an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub products: usize,
    pub transactions: usize,
    pub expenses: usize,
    pub formulations: usize,
}

impl From<&AppState> for ImportSummary {
    fn from(state: &AppState) -> Self {
        ImportSummary {
            products: state.products.len(),
            transactions: state.transactions.len(),
            expenses: state.expenses.len(),
            formulations: state.formulations.len(),
        }
    }
}

/// Writes `orina_backup_<date>.json` into `dir`.
pub fn export_backup(controller: &AppController, dir: &Path, date: NaiveDate) -> Result<PathBuf, ApiError> {
    Ok(write_backup(controller.state(), dir, date)?)
}

/// [`export_backup`] dated with the local calendar day of `now`.
pub fn export_backup_now(controller: &AppController, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf, ApiError> {
    export_backup(controller, dir, now.with_timezone(&Local).date_naive())
}

/// Replaces the whole state with a backup file.
pub fn import_backup(
    controller: &mut AppController,
    path: &Path,
    now: DateTime<Utc>,
) -> Result<ImportSummary, ApiError> {
    let state = import_file(path)?;
    let summary = ImportSummary::from(&state);

    submit(controller, Command::ReplaceState(Box::new(state)), now);
    info!(path = %path.display(), products = summary.products, "Backup restored");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seeded_controller;
    use crate::error::ErrorCode;
    use orina_core::User;

    #[test]
    fn test_export_then_import() {
        let (dir, mut controller, now) = seeded_controller();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let path = export_backup(&controller, dir.path(), date).unwrap();
        assert!(path.ends_with("orina_backup_2024-03-15.json"));

        let original = controller.state().clone();
        crate::commands::product::delete_product(&mut controller, "fg-2", true, now).unwrap();

        let summary = import_backup(&mut controller, &path, now).unwrap();

        assert_eq!(summary, ImportSummary::from(&original));
        assert_eq!(controller.state(), &original);
        assert_eq!(controller.state().current_user, User::default_identity());
    }

    #[test]
    fn test_invalid_backup_leaves_state() {
        let (dir, mut controller, now) = seeded_controller();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"products": []}"#).unwrap();
        let before = controller.state().clone();

        let err = import_backup(&mut controller, &path, now).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidSnapshot);
        assert_eq!(controller.state(), &before);
    }

    #[test]
    fn test_missing_backup_file() {
        let (dir, mut controller, now) = seeded_controller();
        let err = import_backup(&mut controller, &dir.path().join("nope.json"), now).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageError);
    }
}

//! # Snapshots
//!
//! Full-state backup files: export the current tree, import a previous one.
//!
//! An import is only shape-checked at the top level (`currentUser` key
//! present, `products` truthy) and then goes through the same sanitizer as a
//! normal load, so a backup written by an older version is upgraded on the
//! way in. The operator identity is always reset to the fixed default.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use orina_core::AppState;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::migrations;

/// `orina_backup_<YYYY-MM-DD>.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("orina_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Serializes the whole state as a snapshot document.
pub fn export_snapshot(state: &AppState) -> StoreResult<String> {
    Ok(serde_json::to_string(state)?)
}

/// Writes a dated backup file into `dir` and returns its path.
pub fn write_backup(state: &AppState, dir: &Path, date: NaiveDate) -> StoreResult<PathBuf> {
    let path = dir.join(backup_file_name(date));
    let text = export_snapshot(state)?;
    fs::write(&path, text).map_err(|e| StoreError::io(&path, e))?;
    info!(path = %path.display(), "Backup written");
    Ok(path)
}

/// Parses and sanitizes a snapshot.
///
/// ## Errors
/// `StoreError::InvalidSnapshot` when the bytes are not JSON, when the
/// `currentUser` key is absent, or when `products` is missing or falsy.
/// The caller's state is never touched on error.
pub fn import_snapshot(bytes: &[u8]) -> StoreResult<AppState> {
    let doc: Value = serde_json::from_slice(bytes).map_err(|e| {
        warn!(error = %e, "Snapshot is not valid JSON");
        StoreError::invalid_snapshot(format!("not valid JSON: {}", e))
    })?;

    let root = doc
        .as_object()
        .ok_or_else(|| StoreError::invalid_snapshot("not a JSON object"))?;

    if !root.contains_key("currentUser") {
        return Err(StoreError::invalid_snapshot("missing currentUser"));
    }
    if !root.get("products").map_or(false, is_truthy) {
        return Err(StoreError::invalid_snapshot("missing products"));
    }

    let state = migrations::sanitize(&doc);
    info!(products = state.products.len(), "Snapshot imported");
    Ok(state)
}

/// Reads and imports a snapshot file.
pub fn import_file(path: &Path) -> StoreResult<AppState> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    import_snapshot(&bytes)
}

/// JavaScript truthiness: null, false, 0 and "" are falsy. Empty arrays and
/// objects are truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

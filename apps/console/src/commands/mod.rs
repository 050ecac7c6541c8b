//! # Console Commands Module
//!
//! Every operation the console exposes, as plain functions over the
//! [`AppController`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (shared helpers)
//! ├── product.rs      ◄─── Inventory listing, add/update/delete, low stock
//! ├── formulation.rs  ◄─── Recipe save and recipe sheet
//! ├── sale.rs         ◄─── Point of sale and invoice history
//! ├── expense.rs      ◄─── Expense ledger
//! ├── settings.rs     ◄─── Store settings and logo upload
//! ├── backup.rs       ◄─── Export and import of the whole document
//! └── report.rs       ◄─── Financial report and dashboard
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Console Command Flow                                 │
//! │                                                                         │
//! │  $ orina sale record --item fg-1=2 --paid 500                          │
//! │         │                                                               │
//! │         │ (clap parses into typed arguments)                            │
//! │         ▼                                                               │
//! │  commands::sale::record_sale(                                          │
//! │      &mut controller,        ◄── owns the state tree                   │
//! │      request,                ◄── from the CLI flags                    │
//! │      now,                    ◄── injected clock                        │
//! │  ) -> Result<Transaction, ApiError>                                    │
//! │         │                                                               │
//! │         │ boundary guards, then controller.dispatch(Command)            │
//! │         ▼                                                               │
//! │  main prints the result as text or JSON                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Confirmation
//! Deletions take a `confirmed` flag. Without it nothing is dispatched and
//! `ErrorCode::ConfirmationRequired` is returned.

pub mod backup;
pub mod expense;
pub mod formulation;
pub mod product;
pub mod report;
pub mod sale;
pub mod settings;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::state::AppController;
use orina_core::Command;

/// Dispatches a command. A failed save has already been logged by the
/// controller and the in-memory change stands, so it is not an error here.
pub(crate) fn submit(controller: &mut AppController, command: Command, now: DateTime<Utc>) {
    let _ = controller.dispatch(command, now);
}

/// Fails with `ConfirmationRequired` unless the caller confirmed.
pub fn require_confirmation(confirmed: bool, what: &str) -> Result<(), ApiError> {
    if confirmed {
        Ok(())
    } else {
        Err(ApiError::unconfirmed(what))
    }
}

/// Parses an `id=quantity` argument.
///
/// ## Example
/// ```rust
/// use orina_console::commands::parse_pair;
/// use rust_decimal::Decimal;
///
/// let (id, qty) = parse_pair("rm-1=0.15").unwrap();
/// assert_eq!(id, "rm-1");
/// assert_eq!(qty, Decimal::new(15, 2));
/// ```
pub fn parse_pair(arg: &str) -> Result<(String, Decimal), String> {
    let (id, qty) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected ID=QUANTITY, got '{}'", arg))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing id in '{}'", arg));
    }

    let quantity = Decimal::from_str(qty.trim()).map_err(|e| format!("bad quantity in '{}': {}", arg, e))?;
    Ok((id.to_string(), quantity))
}

/// A controller over the seed data, saving into a temp dir.
#[cfg(test)]
pub(crate) fn seeded_controller() -> (tempfile::TempDir, AppController, DateTime<Utc>) {
    use chrono::TimeZone;
    use orina_store::{seed_state, StateStore, StoreConfig};

    let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = StateStore::new(StoreConfig::new(dir.path().join("state.json")));
    let controller = AppController::with_state(store, seed_state(now));
    (dir, controller, now)
}

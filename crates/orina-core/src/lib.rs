//! # orina-core: Pure Business Logic for Orina Operations
//!
//! This crate is the **heart** of Orina Operations. It contains the
//! inventory, costing, formulation and ledger rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Orina Operations Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Console (apps/console)                       │   │
//! │  │    product ──► formulation ──► sale ──► report ──► backup       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Command                                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orina-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │  costing  │  │formulation│  │  ledger   │  │   │
//! │  │   │  catalog  │  │   BOM     │  │  upsert   │  │ sales/exp │  │   │
//! │  │   │  stock    │  │  margins  │  │  drafts   │  │  reports  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                 state::AppState::apply (reducer)                │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CLOCK READS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                orina-store (Persistence Adapter)                │   │
//! │  │          JSON document, sanitization, seed data, snapshots      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Formulation, Transaction, etc.)
//! - [`money`] - Exact decimal Money type
//! - [`costing`] - Bill-of-materials cost derivation
//! - [`inventory`] - Catalog and stock transitions
//! - [`formulation`] - Recipe upsert and editor draft
//! - [`ledger`] - Sales history, expenses, reports, the sale cart
//! - [`state`] - The state tree and its reducer
//! - [`validation`] - Boundary guards
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Immutable Trees**: every transition returns a new `AppState`
//! 2. **No I/O**: the store and the console own files, clocks and logs output
//! 3. **Exact Decimals**: fractional recipe quantities never touch floats
//! 4. **Derived, Not Stored**: finished-good cost is recomputed on every read
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use orina_core::{AppState, Command, ProductDraft, ProductKind};
//!
//! let state = AppState::default();
//! let next = state.apply(Command::AddProduct(ProductDraft::new(ProductKind::RawMaterial)), Utc::now());
//!
//! assert!(state.products.is_empty());
//! assert_eq!(next.products.len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod costing;
pub mod error;
pub mod formulation;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod state;
pub mod types;
pub mod validation;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use formulation::FormulationDraft;
pub use inventory::{InventoryFilter, InventoryRow, ProductDraft};
pub use ledger::{DashboardSummary, FinancialSummary, Report, ReportRange, SaleDraft};
pub use money::Money;
pub use state::{AppState, Command};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Category literal that marks a finished good. Matched exactly.
pub const FINISHED_GOOD_CATEGORY: &str = "Finished Good";

/// Category written for new raw materials.
pub const RAW_MATERIAL_CATEGORY: &str = "Raw Material";

/// Party name used when a sale is rung up without one.
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Name given to a product saved without one.
pub const UNNAMED_ITEM: &str = "Unnamed Item";

/// Reorder threshold used when none is given.
pub const DEFAULT_MIN_STOCK_ALERT: i64 = 5;

/// Largest brand logo accepted, in bytes.
pub const MAX_LOGO_BYTES: usize = 500_000;

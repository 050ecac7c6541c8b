//! # Orina Console Library
//!
//! Everything behind the `orina` binary: configuration, the controller
//! that owns the state tree, and one function per operation.
//!
//! ## Module Organization
//! ```text
//! orina_console/
//! ├── lib.rs          ◄─── You are here (tracing setup)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── config.rs     ◄─── ConsoleConfig (env > orina.toml > defaults)
//! │   └── controller.rs ◄─── AppController (publish + save)
//! ├── commands/
//! │   ├── mod.rs        ◄─── Shared helpers (confirmation, id=qty parsing)
//! │   ├── product.rs    ◄─── Inventory
//! │   ├── formulation.rs◄─── Recipes
//! │   ├── sale.rs       ◄─── Point of sale
//! │   ├── expense.rs    ◄─── Expenses
//! │   ├── settings.rs   ◄─── Store settings
//! │   ├── backup.rs     ◄─── Export / import
//! │   └── report.rs     ◄─── Reports and dashboard
//! └── error.rs        ◄─── ApiError for command results
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Console Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,orina=debug; override with RUST_LOG                 │
//! │                                                                         │
//! │  2. Resolve Configuration ────────────────────────────────────────────► │
//! │     • --state flag > ORINA_STATE_PATH > orina.toml > platform data dir  │
//! │                                                                         │
//! │  3. Open Controller ──────────────────────────────────────────────────► │
//! │     • Missing or corrupt document: seed data                            │
//! │     • Otherwise: sanitized document                                     │
//! │                                                                         │
//! │  4. Run One Command ──────────────────────────────────────────────────► │
//! │     • Print the result as text or JSON                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages from every crate
/// - `RUST_LOG=orina_store=trace` - Trace the store only
/// - Default: `info,orina=debug`
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,orina=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

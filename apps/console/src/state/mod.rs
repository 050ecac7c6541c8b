//! # State Module
//!
//! What a console invocation holds while it runs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐         ┌──────────────────────────────────┐ │
//! │  │   ConsoleConfig      │         │         AppController            │ │
//! │  │                      │ opens   │                                  │ │
//! │  │  state_path          │────────►│  store:    StateStore            │ │
//! │  │  backup_dir          │         │  state:    AppState (published)  │ │
//! │  │  operator            │         │  operator: recordedBy name       │ │
//! │  │  pretty              │         │                                  │ │
//! │  └──────────────────────┘         └──────────────────────────────────┘ │
//! │                                                                         │
//! │  The config is read once at start-up. The controller owns the only     │
//! │  authoritative tree; commands read it and submit Commands to it.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod controller;

pub use config::{default_data_dir, ConfigError, ConsoleConfig, CONFIG_FILE_NAME};
pub use controller::AppController;

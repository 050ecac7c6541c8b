//! # Seed Document Writer
//!
//! Writes the default state to a document file for development.
//!
//! ## Usage
//! ```bash
//! # Write ./orina_dev.json
//! cargo run -p orina-store --bin seed
//!
//! # Specify the path, overwrite an existing file
//! cargo run -p orina-store --bin seed -- --path ./data/orina_state.json --force
//! ```

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use orina_store::{seed_state, StateStore, StoreConfig};

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Orina Operations seed document writer")]
struct Args {
    /// Document file path
    #[arg(short, long, default_value = "./orina_dev.json")]
    path: PathBuf,

    /// Overwrite an existing document
    #[arg(short, long)]
    force: bool,

    /// Indent the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("🌱 Orina Operations Seed Writer");
    println!("===============================");
    println!("Document: {}", args.path.display());
    println!();

    let store = StateStore::new(StoreConfig::new(&args.path).pretty(args.pretty));

    if store.exists() && !args.force {
        println!("⚠ Document already exists");
        println!("  Skipping seed to avoid overwriting data.");
        println!("  Pass --force to replace it.");
        return Ok(());
    }

    let state = seed_state(Utc::now());
    store.save(&state)?;

    println!("✓ Products:      {}", state.products.len());
    println!("✓ Transactions:  {}", state.transactions.len());
    println!("✓ Expenses:      {}", state.expenses.len());
    println!("✓ Formulations:  {}", state.formulations.len());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

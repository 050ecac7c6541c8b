//! # Orina Console Entry Point
//!
//! ## Usage
//! ```bash
//! # Inventory with derived unit costs
//! orina product list --kind finished
//!
//! # Ring up a sale: 2 juices, 300 received
//! orina sale record --item fg-1=2 --paid 300 --party "Ali Traders"
//!
//! # Without --paid the invoice is recorded as PAID in full
//! orina sale record --item fg-2=1
//!
//! # This month's profit and loss as JSON
//! orina --json report --range month
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use orina_console::commands::{
    self, backup, expense, formulation, parse_pair, product, report, sale, settings,
};
use orina_console::error::ApiError;
use orina_console::init_tracing;
use orina_console::state::{AppController, ConsoleConfig};
use orina_core::{
    InventoryFilter, InventoryRow, Language, Money, Product, ProductDraft, ProductKind, ReportRange,
    SaleChannel, Transaction,
};
use orina_store::{StateStore, StoreConfig};

// =============================================================================
// Command Line
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "orina", version, about = "Orina Operations: inventory, costing, sales and reports")]
struct Cli {
    /// Document path (overrides ORINA_STATE_PATH and orina.toml)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Config file (default: orina.toml in the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inventory and catalog
    #[command(subcommand)]
    Product(ProductCmd),

    /// Finished-good recipes
    #[command(subcommand)]
    Formulation(FormulationCmd),

    /// Point of sale and invoices
    #[command(subcommand)]
    Sale(SaleCmd),

    /// Expense ledger
    #[command(subcommand)]
    Expense(ExpenseCmd),

    /// Store settings
    #[command(subcommand)]
    Settings(SettingsCmd),

    /// Profit and loss for a date range
    Report {
        #[arg(long, value_enum, default_value_t = RangeArg::Today)]
        range: RangeArg,
    },

    /// All-time totals and low-stock alerts
    Dashboard,

    /// Export or import the whole document
    #[command(subcommand)]
    Backup(BackupCmd),
}

#[derive(Debug, Subcommand)]
enum ProductCmd {
    /// List products with stock and unit cost
    List {
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        /// Case-insensitive match on name or SKU
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Add a product
    Add {
        #[arg(long, value_enum)]
        kind: KindArg,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Change fields of an existing product
    Update {
        id: String,
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Products at or below their reorder threshold
    LowStock,
}

#[derive(Debug, Args)]
struct ProductFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    sku: Option<String>,
    #[arg(long)]
    stock: Option<Decimal>,
    #[arg(long = "min-stock")]
    min_stock_alert: Option<Decimal>,
    /// Unit cost (raw materials only)
    #[arg(long)]
    cost: Option<Decimal>,
    /// Retail price (finished goods only)
    #[arg(long)]
    retail: Option<Decimal>,
    /// Wholesale price (finished goods only)
    #[arg(long)]
    wholesale: Option<Decimal>,
}

#[derive(Debug, Subcommand)]
enum FormulationCmd {
    /// Replace a product's recipe
    Save {
        product_id: String,
        /// Ingredient as RAW_MATERIAL_ID=QUANTITY (repeatable)
        #[arg(long = "ingredient", value_parser = parse_pair)]
        ingredients: Vec<(String, Decimal)>,
        /// Preparation step (repeatable, in order)
        #[arg(long = "step")]
        steps: Vec<String>,
    },
    /// Show the costed recipe sheet
    Show { product_id: String },
}

#[derive(Debug, Subcommand)]
enum SaleCmd {
    /// Record a sale
    Record {
        #[arg(long, value_enum, default_value_t = ChannelArg::Retail)]
        channel: ChannelArg,
        /// Customer name (blank for walk-in)
        #[arg(long, default_value = "")]
        party: String,
        /// Amount received. Omit it to record the invoice as PAID in full;
        /// pass 0 for a CREDIT sale
        #[arg(long)]
        paid: Option<Decimal>,
        /// Line as PRODUCT_ID=QUANTITY (repeatable)
        #[arg(long = "item", value_parser = parse_pair)]
        items: Vec<(String, Decimal)>,
    },
    /// Invoice history, newest first
    List,
    /// Delete an invoice (stock is not restored)
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ExpenseCmd {
    /// Record an expense
    Add {
        #[arg(long)]
        category: String,
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "")]
        description: String,
        /// YYYY-MM-DD (default: now)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Expenses, newest first
    List,
    /// Delete an expense
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsCmd {
    Show,
    Update {
        #[arg(long)]
        currency: Option<String>,
        #[arg(long)]
        brand_name: Option<String>,
        #[arg(long)]
        brand_address: Option<String>,
        #[arg(long)]
        brand_phone: Option<String>,
        /// Image file to embed as the logo
        #[arg(long, conflicts_with = "clear_logo")]
        logo: Option<PathBuf>,
        #[arg(long)]
        clear_logo: bool,
        #[arg(long, value_enum)]
        language: Option<LanguageArg>,
    },
}

#[derive(Debug, Subcommand)]
enum BackupCmd {
    /// Write orina_backup_<date>.json
    Export {
        /// Target directory (default: backup_dir from config)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replace all data with a backup file
    Import {
        file: PathBuf,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Finished,
    Raw,
}

impl From<KindArg> for ProductKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Finished => ProductKind::FinishedGood,
            KindArg::Raw => ProductKind::RawMaterial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChannelArg {
    Retail,
    Wholesale,
}

impl From<ChannelArg> for SaleChannel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Retail => SaleChannel::Retail,
            ChannelArg::Wholesale => SaleChannel::Wholesale,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RangeArg {
    Today,
    Week,
    Month,
    All,
}

impl From<RangeArg> for ReportRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Today => ReportRange::Today,
            RangeArg::Week => ReportRange::Week,
            RangeArg::Month => ReportRange::Month,
            RangeArg::All => ReportRange::AllTime,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LanguageArg {
    Urdu,
    English,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Urdu => Language::Urdu,
            LanguageArg::English => Language::English,
        }
    }
}

// =============================================================================
// Main
// =============================================================================

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ConsoleConfig::load_or_default(cli.config.clone());
    if let Some(path) = cli.state.clone() {
        config.state_path = path;
    }
    info!(path = %config.state_path.display(), "Using document");

    let store = StateStore::new(StoreConfig::new(&config.state_path).pretty(config.pretty));
    let mut controller = AppController::open(store, Utc::now()).with_operator(config.operator.clone());

    let json = cli.json;
    match run(cli.command, &mut controller, &config, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                match serde_json::to_string_pretty(&err) {
                    Ok(text) => eprintln!("{}", text),
                    Err(_) => eprintln!("{}", err),
                }
            } else {
                eprintln!("error: {}", err);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, controller: &mut AppController, config: &ConsoleConfig, json: bool) -> Result<(), ApiError> {
    let now = Utc::now();
    let currency = controller.state().settings.currency.clone();
    let out = Printer { json, currency };

    match command {
        Commands::Product(cmd) => match cmd {
            ProductCmd::List { kind, search } => {
                let filter = InventoryFilter {
                    kind: kind.map(Into::into),
                    search,
                };
                let rows = product::list_products(controller, &filter);
                out.emit(&rows, || out.inventory(&rows))
            }
            ProductCmd::Add { kind, fields } => {
                let draft = fields.into_draft(kind.into());
                let created = product::add_product(controller, draft, now)?;
                out.emit(&created, || out.product(&created))
            }
            ProductCmd::Update { id, kind, fields } => {
                let changes = fields.into_changes(kind.map(Into::into));
                let updated = product::update_product(controller, &id, changes, now)?;
                out.emit(&updated, || out.product(&updated))
            }
            ProductCmd::Delete { id, yes } => {
                let removed = product::delete_product(controller, &id, yes, now)?;
                out.emit(&removed, || println!("Deleted {} ({})", removed.name, removed.id))
            }
            ProductCmd::LowStock => {
                let alerts = product::low_stock(controller);
                out.emit(&alerts, || {
                    for p in &alerts {
                        println!("{:<12} {:<40} stock {:>8}  alert at {}", p.id, p.name, p.stock, p.min_stock_alert);
                    }
                })
            }
        },

        Commands::Formulation(cmd) => match cmd {
            FormulationCmd::Save {
                product_id,
                ingredients,
                steps,
            } => {
                let saved = formulation::save_formulation(controller, &product_id, &ingredients, &steps, now)?;
                let sheet = formulation::formulation_sheet(controller, &saved.product_id)?;
                out.emit(&sheet, || out.sheet(&sheet))
            }
            FormulationCmd::Show { product_id } => {
                let sheet = formulation::formulation_sheet(controller, &product_id)?;
                out.emit(&sheet, || out.sheet(&sheet))
            }
        },

        Commands::Sale(cmd) => match cmd {
            SaleCmd::Record {
                channel,
                party,
                paid,
                items,
            } => {
                let request = sale::SaleRequest {
                    channel: channel.into(),
                    party_name: party,
                    paid_amount: paid.map(Money::new),
                    items,
                };
                let tx = sale::record_sale(controller, request, now)?;
                out.emit(&tx, || out.invoice(&tx))
            }
            SaleCmd::List => {
                let list = sale::list_transactions(controller);
                out.emit(&list, || {
                    for tx in &list {
                        out.invoice_row(tx);
                    }
                })
            }
            SaleCmd::Delete { id, yes } => {
                let removed = sale::delete_transaction(controller, &id, yes, now)?;
                out.emit(&removed, || println!("Deleted invoice {}", removed.id))
            }
        },

        Commands::Expense(cmd) => match cmd {
            ExpenseCmd::Add {
                category,
                amount,
                description,
                date,
            } => {
                let added = expense::add_expense(controller, &category, Money::new(amount), &description, date, now)?;
                out.emit(&added, || println!("Recorded {} {}", added.id, out.money(added.amount)))
            }
            ExpenseCmd::List => {
                let list = expense::list_expenses(controller);
                out.emit(&list, || {
                    for e in &list {
                        println!(
                            "{:<18} {}  {:<16} {:>14}  {}",
                            e.id,
                            e.date.format("%Y-%m-%d"),
                            e.category,
                            out.money(e.amount),
                            e.description
                        );
                    }
                })
            }
            ExpenseCmd::Delete { id, yes } => {
                let removed = expense::delete_expense(controller, &id, yes, now)?;
                out.emit(&removed, || println!("Deleted expense {}", removed.id))
            }
        },

        Commands::Settings(cmd) => match cmd {
            SettingsCmd::Show => {
                let current = settings::show_settings(controller);
                out.emit(&current, || out.settings(&current))
            }
            SettingsCmd::Update {
                currency,
                brand_name,
                brand_address,
                brand_phone,
                logo,
                clear_logo,
                language,
            } => {
                let changes = settings::SettingsChanges {
                    currency,
                    brand_name,
                    brand_address,
                    brand_phone,
                    logo,
                    clear_logo,
                    language: language.map(Into::into),
                };
                let updated = settings::update_settings(controller, changes, now)?;
                out.emit(&updated, || out.settings(&updated))
            }
        },

        Commands::Report { range } => {
            let built = report::report(controller, range.into(), now);
            out.emit(&built, || {
                let s = &built.summary;
                println!("Report: {:?}", built.range);
                println!("  Sales          {:>16}", out.money(s.total_sales));
                println!("  Cost of goods  {:>16}", out.money(s.total_cost));
                println!("  Gross profit   {:>16}", out.money(s.gross_profit));
                println!("  Expenses       {:>16}", out.money(s.total_expenses));
                println!("  Net profit     {:>16}", out.money(s.net_profit));
                println!();
                for tx in &built.transactions {
                    out.invoice_row(tx);
                }
            })
        }

        Commands::Dashboard => {
            let summary = report::dashboard(controller);
            out.emit(&summary, || {
                println!("Total sales      {:>16}", out.money(summary.total_sales));
                println!("Total purchases  {:>16}", out.money(summary.total_purchases));
                println!("Total expenses   {:>16}", out.money(summary.total_expenses));
                println!("Net              {:>16}", out.money(summary.net));
                println!();
                println!("Low stock: {}", summary.low_stock_count);
                for p in &summary.low_stock {
                    println!("  ⚠ {} ({} left)", p.name, p.stock);
                }
            })
        }

        Commands::Backup(cmd) => match cmd {
            BackupCmd::Export { dir } => {
                let dir = dir.unwrap_or_else(|| config.backup_dir.clone());
                let path = backup::export_backup_now(controller, &dir, now)?;
                out.emit(&path, || println!("✓ Backup written to {}", path.display()))
            }
            BackupCmd::Import { file, yes } => {
                commands::require_confirmation(yes, "all current data")?;
                let summary = backup::import_backup(controller, &file, now)?;
                out.emit(&summary, || {
                    println!("✓ Restored from {}", file.display());
                    println!("  Products:      {}", summary.products);
                    println!("  Transactions:  {}", summary.transactions);
                    println!("  Expenses:      {}", summary.expenses);
                    println!("  Formulations:  {}", summary.formulations);
                })
            }
        },
    }
}

impl ProductFields {
    fn into_draft(self, kind: ProductKind) -> ProductDraft {
        ProductDraft {
            kind,
            name: self.name,
            sku: self.sku,
            stock: self.stock,
            min_stock_alert: self.min_stock_alert,
            cost_price: self.cost.map(Money::new),
            retail_price: self.retail.map(Money::new),
            wholesale_price: self.wholesale.map(Money::new),
        }
    }

    fn into_changes(self, kind: Option<ProductKind>) -> product::ProductChanges {
        product::ProductChanges {
            kind,
            name: self.name,
            sku: self.sku,
            stock: self.stock,
            min_stock_alert: self.min_stock_alert,
            cost_price: self.cost.map(Money::new),
            retail_price: self.retail.map(Money::new),
            wholesale_price: self.wholesale.map(Money::new),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

struct Printer {
    json: bool,
    currency: String,
}

impl Printer {
    /// JSON on stdout with `--json`, otherwise the text rendering.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> Result<(), ApiError> {
        if self.json {
            let rendered = serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Could not render output: {}", e)))?;
            println!("{}", rendered);
        } else {
            text();
        }
        Ok(())
    }

    fn money(&self, amount: Money) -> String {
        amount.format(&self.currency)
    }

    fn inventory(&self, rows: &[InventoryRow]) {
        println!(
            "{:<10} {:<9} {:<40} {:>9} {:>14} {:>14} {:>14}",
            "ID", "SKU", "NAME", "STOCK", "UNIT COST", "RETAIL", "WHOLESALE"
        );
        for r in rows {
            let flag = if r.needs_reorder { " ⚠" } else { "" };
            println!(
                "{:<10} {:<9} {:<40} {:>9} {:>14} {:>14} {:>14}{}",
                r.id,
                r.sku,
                r.name,
                r.stock,
                self.money(r.unit_cost),
                self.money(r.retail_price),
                self.money(r.wholesale_price),
                flag
            );
        }
    }

    fn product(&self, p: &Product) {
        println!("{} ({})", p.name, p.id);
        println!("  SKU        {}", p.sku);
        println!("  Category   {}", p.category);
        println!("  Stock      {} (alert at {})", p.stock, p.min_stock_alert);
        if p.is_finished_good() {
            println!("  Retail     {}", self.money(p.retail_price));
            println!("  Wholesale  {}", self.money(p.wholesale_price));
        } else {
            println!("  Cost       {}", self.money(p.cost_price));
        }
    }

    fn sheet(&self, sheet: &orina_core::costing::FormulationSheet) {
        println!("Recipe: {} ({})", sheet.product_name, sheet.product_id);
        for line in &sheet.lines {
            println!(
                "  {:<40} {:>8} x {:>12} = {:>14}",
                line.name,
                line.quantity,
                self.money(line.unit_cost),
                self.money(line.line_cost)
            );
        }
        println!("  Total cost        {}", self.money(sheet.total_cost));
        println!("  Retail margin     {}", self.money(sheet.retail_margin));
        println!("  Wholesale margin  {}", self.money(sheet.wholesale_margin));
        for (i, step) in sheet.instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    fn invoice(&self, tx: &Transaction) {
        println!("✓ Invoice {} for {}", tx.id, tx.party_name);
        for line in &tx.items {
            println!(
                "  {:<40} {:>8} x {:>12} = {:>14}",
                line.name,
                line.quantity,
                self.money(line.price),
                self.money(line.line_total())
            );
        }
        println!("  Total  {}", self.money(tx.total_amount));
        println!("  Paid   {}", self.money(tx.paid_amount));
        println!("  Status {:?}", tx.status);
    }

    fn invoice_row(&self, tx: &Transaction) {
        println!(
            "{:<12} {}  {:<28} {:>14} {:>14}  {:?}",
            tx.id,
            tx.date.format("%Y-%m-%d %H:%M"),
            tx.party_name,
            self.money(tx.total_amount),
            self.money(tx.paid_amount),
            tx.status
        );
    }

    fn settings(&self, s: &orina_core::AppSettings) {
        println!("Brand     {}", s.brand_name);
        println!("Address   {}", s.brand_address);
        println!("Phone     {}", s.brand_phone);
        println!("Currency  {}", s.currency);
        println!("Language  {:?} ({})", s.language, s.language.tag());
        println!("Logo      {}", if s.brand_logo.is_empty() { "none" } else { "set" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_sale_without_paid_is_paid_in_full() {
        let cli = Cli::try_parse_from(["orina", "sale", "record", "--item", "fg-1=2"]).unwrap();
        match cli.command {
            Commands::Sale(SaleCmd::Record { paid, items, .. }) => {
                assert!(paid.is_none());
                assert_eq!(items, vec![("fg-1".to_string(), Decimal::from(2))]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let mut cli = Cli::command();
        let record = cli
            .find_subcommand_mut("sale")
            .and_then(|sale| sale.find_subcommand_mut("record"))
            .unwrap();
        let help = record
            .get_arguments()
            .find(|arg| arg.get_id() == "paid")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();
        assert!(help.contains("PAID in full"), "{}", help);
    }
}

//! # Application State
//!
//! The whole state tree and the single reducer that moves it forward.
//!
//! ## Reducer
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   AppState (old) ──► apply(Command, now) ──► AppState (new)            │
//! │        │                    │                                           │
//! │        │                    ├── AddProduct ──────► inventory            │
//! │        │                    ├── UpdateProduct ───► inventory            │
//! │        │                    ├── DeleteProduct ───► inventory            │
//! │        │                    ├── SaveFormulation ─► formulation          │
//! │        │                    ├── RecordSale ──────► ledger (+inventory)  │
//! │        │                    ├── DeleteTransaction► ledger               │
//! │        │                    ├── Add/DeleteExpense► ledger               │
//! │        │                    ├── UpdateSettings ──► replace settings     │
//! │        │                    └── ReplaceState ────► import               │
//! │        │                                                                │
//! │        └── never mutated: readers holding it keep a consistent view     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `apply` never fails. Preconditions (non-empty cart, formulation has a
//! product and ingredients) are checked by [`crate::validation`] before a
//! command is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::formulation;
use crate::inventory::{self, ProductDraft};
use crate::ledger;
use crate::types::{AppSettings, Expense, Formulation, Product, Transaction, User};

/// Everything the application knows, persisted as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppState {
    pub current_user: User,
    pub products: Vec<Product>,
    /// Newest first.
    pub transactions: Vec<Transaction>,
    /// Newest first.
    pub expenses: Vec<Expense>,
    pub formulations: Vec<Formulation>,
    pub settings: AppSettings,
}

impl Default for AppState {
    /// An empty catalog with default settings and the fixed identity.
    fn default() -> Self {
        AppState {
            current_user: User::default_identity(),
            products: Vec::new(),
            transactions: Vec::new(),
            expenses: Vec::new(),
            formulations: Vec::new(),
            settings: AppSettings::default(),
        }
    }
}

/// A state transition requested by a collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddProduct(ProductDraft),
    UpdateProduct(Product),
    DeleteProduct(String),
    SaveFormulation(Formulation),
    RecordSale(Transaction),
    DeleteTransaction(String),
    AddExpense(Expense),
    DeleteExpense(String),
    UpdateSettings(AppSettings),
    /// Replace everything (snapshot import).
    ReplaceState(Box<AppState>),
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddProduct(_) => "add_product",
            Command::UpdateProduct(_) => "update_product",
            Command::DeleteProduct(_) => "delete_product",
            Command::SaveFormulation(_) => "save_formulation",
            Command::RecordSale(_) => "record_sale",
            Command::DeleteTransaction(_) => "delete_transaction",
            Command::AddExpense(_) => "add_expense",
            Command::DeleteExpense(_) => "delete_expense",
            Command::UpdateSettings(_) => "update_settings",
            Command::ReplaceState(_) => "replace_state",
        }
    }
}

impl AppState {
    /// Computes the next state. `self` is left untouched.
    pub fn apply(&self, command: Command, now: DateTime<Utc>) -> AppState {
        debug!(command = command.name(), "Applying command");

        match command {
            Command::AddProduct(draft) => AppState {
                products: inventory::add_product(&self.products, draft, now),
                ..self.clone()
            },
            Command::UpdateProduct(product) => AppState {
                products: inventory::update_product(&self.products, product, now),
                ..self.clone()
            },
            Command::DeleteProduct(id) => AppState {
                products: inventory::delete_product(&self.products, &id),
                ..self.clone()
            },
            Command::SaveFormulation(f) => AppState {
                formulations: formulation::save_formulation(&self.formulations, f),
                ..self.clone()
            },
            Command::RecordSale(tx) => ledger::record_sale(self, tx),
            Command::DeleteTransaction(id) => AppState {
                transactions: ledger::delete_transaction(&self.transactions, &id),
                ..self.clone()
            },
            Command::AddExpense(expense) => AppState {
                expenses: ledger::add_expense(&self.expenses, expense),
                ..self.clone()
            },
            Command::DeleteExpense(id) => AppState {
                expenses: ledger::delete_expense(&self.expenses, &id),
                ..self.clone()
            },
            Command::UpdateSettings(settings) => AppState {
                settings,
                ..self.clone()
            },
            Command::ReplaceState(state) => *state,
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn formulation_for(&self, product_id: &str) -> Option<&Formulation> {
        formulation::formulation_for(&self.formulations, product_id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Finished goods, in catalog order.
    pub fn finished_goods(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_finished_good())
    }

    /// Raw materials and packaging, in catalog order.
    pub fn raw_materials(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| !p.is_finished_good())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::cost_of_finished_good;
    use crate::money::Money;
    use crate::testing::{finished_good, formulation, raw_material, state_with, t0};
    use crate::types::{Language, LineItem, PaymentStatus, ProductKind, SaleChannel, TransactionType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn sale_of(product_id: &str, quantity: Decimal) -> Transaction {
        Transaction {
            id: "INV-424242".to_string(),
            date: t0(),
            kind: TransactionType::Sale,
            party_name: "Super Mart Lahore".to_string(),
            items: vec![LineItem {
                product_id: product_id.to_string(),
                quantity,
                price: Money::from_major(280),
                name: "Premium Mango Juice 1L".to_string(),
            }],
            total_amount: Money::from_major(280).times(quantity),
            paid_amount: Money::zero(),
            status: PaymentStatus::Credit,
            recorded_by: "Administrator".to_string(),
            sale_type: SaleChannel::Wholesale,
        }
    }

    fn base() -> AppState {
        state_with(
            vec![
                raw_material("rm-1", 140, dec!(500)),
                finished_good("fg-1", 350, 280, dec!(10)),
            ],
            vec![],
        )
    }

    #[test]
    fn test_sale_then_delete_keeps_deduction() {
        let state = base();
        let sold = state.apply(Command::RecordSale(sale_of("fg-1", dec!(3))), t0());
        assert_eq!(sold.product("fg-1").unwrap().stock, dec!(7));
        assert_eq!(sold.transactions[0].id, "INV-424242");

        let deleted = sold.apply(Command::DeleteTransaction("INV-424242".to_string()), t0());
        assert!(deleted.transactions.is_empty());
        assert_eq!(deleted.product("fg-1").unwrap().stock, dec!(7));
    }

    #[test]
    fn test_oversell_through_reducer() {
        let sold = base().apply(Command::RecordSale(sale_of("fg-1", dec!(15))), t0());
        assert_eq!(sold.product("fg-1").unwrap().stock, dec!(-5));
    }

    #[test]
    fn test_formulation_upsert_and_cost() {
        let state = base()
            .apply(
                Command::SaveFormulation(formulation("fg-1", &[("rm-1", dec!(1))])),
                t0(),
            )
            .apply(
                Command::SaveFormulation(formulation("fg-1", &[("rm-1", dec!(0.25))])),
                t0(),
            );

        assert_eq!(state.formulations.len(), 1);
        assert_eq!(cost_of_finished_good(&state, "fg-1"), Money::new(dec!(35)));
    }

    #[test]
    fn test_product_lifecycle() {
        let state = base().apply(
            Command::AddProduct(ProductDraft::new(ProductKind::RawMaterial)),
            t0(),
        );
        assert_eq!(state.products.len(), 3);
        assert_eq!(state.raw_materials().count(), 2);

        let mut edited = state.product("rm-1").unwrap().clone();
        edited.stock = dec!(42);
        let state = state.apply(Command::UpdateProduct(edited), t0());
        assert_eq!(state.product("rm-1").unwrap().stock, dec!(42));

        let state = state.apply(Command::DeleteProduct("rm-1".to_string()), t0());
        assert!(state.product("rm-1").is_none());
        assert_eq!(state.finished_goods().count(), 1);
    }

    #[test]
    fn test_apply_leaves_previous_tree_untouched() {
        let before = base();
        let snapshot = before.clone();
        let _after = before.apply(Command::DeleteProduct("fg-1".to_string()), t0());
        assert_eq!(before, snapshot);
    }

    #[test]
    fn test_settings_and_replace() {
        let mut settings = AppSettings::default();
        settings.language = Language::English;
        let state = base().apply(Command::UpdateSettings(settings.clone()), t0());
        assert_eq!(state.settings, settings);

        let replaced = state.apply(Command::ReplaceState(Box::new(AppState::default())), t0());
        assert!(replaced.products.is_empty());
    }
}

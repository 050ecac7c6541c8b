//! # Transaction Ledger
//!
//! The history of sales plus the separate expense list, and the reports
//! computed over them.
//!
//! ## Recording a Sale
//! ```text
//! ┌────────────┐  finalize   ┌─────────────┐  record_sale  ┌──────────────────┐
//! │ SaleDraft  │ ──────────► │ Transaction │ ────────────► │ new AppState     │
//! │ (the cart) │  id, status │ (frozen)    │               │  stock −= qty    │
//! └────────────┘  total      └─────────────┘               │  history = [tx]++│
//!                                                          └──────────────────┘
//! ```
//! Both halves land in the same new tree: there is no state in which the
//! transaction is visible but the stock is not yet deducted.
//!
//! ## Deleting is Asymmetric
//! Deleting a transaction removes it from history and revenue, but the stock
//! it deducted stays deducted. Physical inventory is adjusted by editing the
//! product.
//!
//! ## Report Ranges
//! ```text
//! Today   ─► since local midnight
//! Week    ─► trailing 7 days from now
//! Month   ─► since the 1st of the current month (local)
//! AllTime ─► everything
//! ```

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::costing;
use crate::error::{CoreError, CoreResult};
use crate::inventory;
use crate::money::Money;
use crate::state::AppState;
use crate::types::{Expense, LineItem, PaymentStatus, Product, SaleChannel, Transaction, TransactionType};
use crate::WALK_IN_CUSTOMER;

/// How many reorder alerts the dashboard lists.
pub const DASHBOARD_ALERTS: usize = 5;

/// Who recorded a sale when no operator name is known.
pub const SYSTEM_RECORDER: &str = "System";

// =============================================================================
// History Transitions
// =============================================================================

/// Deducts stock for every line and prepends the transaction, in one step.
///
/// There is no insufficient-stock check; stock may go negative.
pub fn record_sale(state: &AppState, transaction: Transaction) -> AppState {
    debug!(
        id = %transaction.id,
        lines = transaction.items.len(),
        total = %transaction.total_amount,
        "Recording sale"
    );

    let products = inventory::apply_sale_deductions(&state.products, &transaction.items);

    let mut transactions = Vec::with_capacity(state.transactions.len() + 1);
    transactions.push(transaction);
    transactions.extend(state.transactions.iter().cloned());

    AppState {
        products,
        transactions,
        ..state.clone()
    }
}

/// Removes a transaction. Stock is not restored.
///
/// Ids are minted from the clock and can repeat, so every transaction
/// carrying `id` is removed, not just the first.
pub fn delete_transaction(transactions: &[Transaction], id: &str) -> Vec<Transaction> {
    transactions.iter().filter(|t| t.id != id).cloned().collect()
}

/// Builds an expense with an `EXP-<epoch millis>` id.
pub fn new_expense(
    category: impl Into<String>,
    amount: Money,
    description: impl Into<String>,
    date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Expense {
    Expense {
        id: format!("EXP-{}", now.timestamp_millis()),
        date,
        category: category.into(),
        amount,
        description: description.into(),
    }
}

/// Prepends an expense (newest first).
pub fn add_expense(expenses: &[Expense], expense: Expense) -> Vec<Expense> {
    debug!(id = %expense.id, amount = %expense.amount, "Adding expense");
    let mut next = Vec::with_capacity(expenses.len() + 1);
    next.push(expense);
    next.extend(expenses.iter().cloned());
    next
}

/// Removes every expense carrying `id`. Like invoice ids, expense ids come
/// from the clock and are not guaranteed unique.
pub fn delete_expense(expenses: &[Expense], id: &str) -> Vec<Expense> {
    expenses.iter().filter(|e| e.id != id).cloned().collect()
}

// =============================================================================
// Reports
// =============================================================================

/// Reporting window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ReportRange {
    #[default]
    Today,
    Week,
    Month,
    AllTime,
}

impl ReportRange {
    /// First instant included in the window, or `None` for all time.
    pub fn start<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
        let tz = now.timezone();
        let today = now.date_naive();

        match self {
            ReportRange::Today => Some(start_of_day(&tz, today)),
            ReportRange::Week => Some((now.clone() - Duration::days(7)).with_timezone(&Utc)),
            ReportRange::Month => Some(start_of_day(&tz, today.with_day(1).unwrap_or(today))),
            ReportRange::AllTime => None,
        }
    }

    fn contains(start: Option<DateTime<Utc>>, date: DateTime<Utc>) -> bool {
        start.map_or(true, |s| date >= s)
    }
}

/// First instant of `date` in `tz`.
///
/// If local midnight is skipped by a DST change, the day starts at the first
/// local time that exists, searched in 15 minute steps.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=DAY_QUARTER_HOURS)
        .map(|step| midnight + Duration::minutes(15 * step))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

const DAY_QUARTER_HOURS: i64 = 24 * 4;

/// Profit-and-loss totals for a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinancialSummary {
    #[ts(type = "number")]
    pub total_sales: Money,
    #[ts(type = "number")]
    pub total_cost: Money,
    #[ts(type = "number")]
    pub gross_profit: Money,
    #[ts(type = "number")]
    pub total_expenses: Money,
    #[ts(type = "number")]
    pub net_profit: Money,
}

/// A report: the totals plus the records that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub range: ReportRange,
    pub summary: FinancialSummary,
    pub transactions: Vec<Transaction>,
    pub expenses: Vec<Expense>,
}

/// Cost of goods for one sale, at today's costs.
///
/// Historical invoices freeze their prices but not their costs, so profit on
/// an old sale moves when raw-material prices move.
pub fn transaction_cost(state: &AppState, transaction: &Transaction) -> Money {
    transaction
        .items
        .iter()
        .map(|line| costing::unit_cost(state, &line.product_id).times(line.quantity))
        .sum()
}

/// Totals for a window, with "today" and "month" taken in the local zone.
pub fn aggregate(state: &AppState, range: ReportRange, now: DateTime<Utc>) -> FinancialSummary {
    report_in(state, range, &now.with_timezone(&Local)).summary
}

/// Totals and records for a window, with "today" and "month" in the local zone.
pub fn report(state: &AppState, range: ReportRange, now: DateTime<Utc>) -> Report {
    report_in(state, range, &now.with_timezone(&Local))
}

/// Same as [`report`] with an explicit time zone.
pub fn report_in<Tz: TimeZone>(state: &AppState, range: ReportRange, now: &DateTime<Tz>) -> Report {
    let start = range.start(now);

    let transactions: Vec<Transaction> = state
        .transactions
        .iter()
        .filter(|t| ReportRange::contains(start, t.date))
        .cloned()
        .collect();
    let expenses: Vec<Expense> = state
        .expenses
        .iter()
        .filter(|e| ReportRange::contains(start, e.date))
        .cloned()
        .collect();

    let sales = || transactions.iter().filter(|t| t.is_sale());
    let total_sales: Money = sales().map(|t| t.total_amount).sum();
    let total_cost: Money = sales().map(|t| transaction_cost(state, t)).sum();
    let total_expenses: Money = expenses.iter().map(|e| e.amount).sum();
    let gross_profit = total_sales - total_cost;

    debug!(?range, ?start, transactions = transactions.len(), "Report computed");

    Report {
        range,
        summary: FinancialSummary {
            total_sales,
            total_cost,
            gross_profit,
            total_expenses,
            net_profit: gross_profit - total_expenses,
        },
        transactions,
        expenses,
    }
}

/// All-time overview shown on the home screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_sales: Money,
    pub total_purchases: Money,
    pub total_expenses: Money,
    /// Sales minus purchases minus expenses.
    pub net: Money,
    /// First few products needing a reorder.
    pub low_stock: Vec<Product>,
    /// How many products need a reorder in total.
    pub low_stock_count: usize,
}

pub fn dashboard(state: &AppState) -> DashboardSummary {
    let total_of = |kind: TransactionType| -> Money {
        state
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.total_amount)
            .sum()
    };

    let total_sales = total_of(TransactionType::Sale);
    let total_purchases = total_of(TransactionType::Purchase);
    let total_expenses: Money = state.expenses.iter().map(|e| e.amount).sum();
    let alerts = inventory::low_stock(&state.products);

    DashboardSummary {
        total_sales,
        total_purchases,
        total_expenses,
        net: total_sales - total_purchases - total_expenses,
        low_stock_count: alerts.len(),
        low_stock: alerts.into_iter().take(DASHBOARD_ALERTS).cloned().collect(),
    }
}

// =============================================================================
// Sale Draft (the point-of-sale cart)
// =============================================================================

/// The cart being rung up at the counter.
///
/// ## Pricing
/// Line prices come from the product's retail or wholesale field for the
/// current channel. Switching channel re-prices every line; adding a product
/// that is already in the cart bumps its quantity and re-applies the price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleDraft {
    pub channel: SaleChannel,
    pub party_name: String,
    pub paid_amount: Money,
    pub lines: Vec<LineItem>,
}

impl SaleDraft {
    pub fn new(channel: SaleChannel) -> Self {
        SaleDraft {
            channel,
            ..Default::default()
        }
    }

    /// Adds one unit of a product.
    pub fn add(&mut self, product: &Product) {
        let price = product.price_for(self.channel);
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(Decimal::ONE);
                line.price = price;
            }
            None => self.lines.push(LineItem {
                product_id: product.id.clone(),
                quantity: Decimal::ONE,
                price,
                name: product.name.clone(),
            }),
        }
    }

    /// Adds `quantity` units of a catalog product looked up by id.
    ///
    /// Raw materials are rejected: only finished goods carry selling prices.
    pub fn add_by_id(&mut self, products: &[Product], product_id: &str, quantity: Decimal) -> CoreResult<()> {
        let product = inventory::find_product(products, product_id)?;
        if !product.is_finished_good() {
            return Err(crate::ValidationError::NotFinishedGood {
                product_id: product_id.to_string(),
            }
            .into());
        }
        if quantity <= Decimal::ZERO {
            return Err(CoreError::Validation(crate::ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }));
        }
        self.add(product);
        self.set_quantity(product_id, quantity);
        Ok(())
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: Decimal) {
        if quantity <= Decimal::ZERO {
            self.remove(product_id);
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Switches channel and re-prices every line still in the catalog.
    pub fn set_channel(&mut self, channel: SaleChannel, products: &[Product]) {
        self.channel = channel;
        for line in &mut self.lines {
            if let Some(p) = products.iter().find(|p| p.id == line.product_id) {
                line.price = p.price_for(channel);
            }
        }
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Freezes the cart into a sale transaction.
    ///
    /// ```text
    /// id        = INV-<last 6 digits of epoch millis>
    /// partyName = given name, or the walk-in sentinel when blank
    /// status    = derived once from paid vs total
    /// ```
    pub fn finalize(self, recorded_by: Option<&str>, now: DateTime<Utc>) -> CoreResult<Transaction> {
        if self.lines.is_empty() {
            return Err(crate::ValidationError::EmptyCart.into());
        }

        let total = self.total();
        let millis = now.timestamp_millis().to_string();
        let suffix = &millis[millis.len().saturating_sub(6)..];
        let party = self.party_name.trim();

        Ok(Transaction {
            id: format!("INV-{}", suffix),
            date: now,
            kind: TransactionType::Sale,
            party_name: if party.is_empty() {
                WALK_IN_CUSTOMER.to_string()
            } else {
                party.to_string()
            },
            items: self.lines,
            total_amount: total,
            paid_amount: self.paid_amount,
            status: PaymentStatus::derive(total, self.paid_amount),
            recorded_by: recorded_by
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(SYSTEM_RECORDER)
                .to_string(),
            sale_type: self.channel,
        })
    }
}

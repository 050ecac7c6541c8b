//! # Sale Commands
//!
//! Point-of-sale checkout and invoice history.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Processing Flow                                 │
//! │                                                                         │
//! │  SaleRequest { channel, party, paid, items: [(id, qty)] }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SaleDraft::new(channel)                                               │
//! │       │  add_by_id for each item  ──► unknown id: NOT_FOUND            │
//! │       │                           ──► raw material: VALIDATION_ERROR   │
//! │       ▼                                                                 │
//! │  draft.finalize(recorded_by, now) ──► empty cart: VALIDATION_ERROR     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Command::RecordSale(tx)                                               │
//! │       │  stock deducted + invoice prepended in one transition          │
//! │       ▼                                                                 │
//! │  Transaction returned (INV-xxxxxx)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use crate::commands::{require_confirmation, submit};
use crate::error::ApiError;
use crate::state::AppController;
use orina_core::validation::validate_sale;
use orina_core::{Command, Money, SaleChannel, SaleDraft, Transaction};

/// A checkout as typed at the counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleRequest {
    pub channel: SaleChannel,
    /// Customer name; blank means a walk-in.
    pub party_name: String,
    /// Amount received. `None` records the invoice as fully paid (PAID).
    pub paid_amount: Option<Money>,
    /// `(product id, quantity)`. Repeated ids add up.
    pub items: Vec<(String, Decimal)>,
}

/// Builds the cart, finalizes it and records the sale.
pub fn record_sale(
    controller: &mut AppController,
    request: SaleRequest,
    now: DateTime<Utc>,
) -> Result<Transaction, ApiError> {
    let mut draft = SaleDraft::new(request.channel);
    draft.party_name = request.party_name;

    for (product_id, quantity) in &request.items {
        let already = draft
            .lines
            .iter()
            .find(|l| &l.product_id == product_id)
            .map_or(Decimal::ZERO, |l| l.quantity);
        draft.add_by_id(&controller.state().products, product_id, already.saturating_add(*quantity))?;
    }

    draft.paid_amount = request.paid_amount.unwrap_or_else(|| draft.total());

    let transaction = draft.finalize(Some(controller.recorded_by()), now)?;
    validate_sale(&transaction)?;

    submit(controller, Command::RecordSale(transaction.clone()), now);

    info!(
        id = %transaction.id,
        total = %transaction.total_amount,
        status = ?transaction.status,
        "Sale recorded"
    );
    Ok(transaction)
}

/// Invoice history, newest first.
pub fn list_transactions(controller: &AppController) -> Vec<Transaction> {
    controller.state().transactions.clone()
}

/// Removes an invoice. Stock sold on it is NOT returned to inventory.
///
/// Invoices sharing the id are removed too; the first match is returned.
pub fn delete_transaction(
    controller: &mut AppController,
    id: &str,
    confirmed: bool,
    now: DateTime<Utc>,
) -> Result<Transaction, ApiError> {
    let removed = controller
        .state()
        .transaction(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Transaction", id))?;
    require_confirmation(confirmed, &format!("invoice {}", id))?;

    submit(controller, Command::DeleteTransaction(id.to_string()), now);
    info!(id = %id, "Transaction deleted");
    Ok(removed)
}

//! # Expense Commands

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::info;

use crate::commands::{require_confirmation, submit};
use crate::error::ApiError;
use crate::state::AppController;
use orina_core::ledger::new_expense;
use orina_core::validation::validate_expense;
use orina_core::{Command, Expense, Money, ValidationError};

/// Records an expense. `date` defaults to today; a given date is stored at
/// midnight UTC.
pub fn add_expense(
    controller: &mut AppController,
    category: &str,
    amount: Money,
    description: &str,
    date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<Expense, ApiError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::required("category").into());
    }

    let date = date
        .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
        .unwrap_or(now);

    let expense = new_expense(category, amount, description.trim(), date, now);
    validate_expense(&expense)?;

    submit(controller, Command::AddExpense(expense.clone()), now);
    info!(id = %expense.id, amount = %expense.amount, "Expense recorded");
    Ok(expense)
}

/// Expenses, newest first.
pub fn list_expenses(controller: &AppController) -> Vec<Expense> {
    controller.state().expenses.clone()
}

/// Removes the expense. Records sharing its id are removed with it.
pub fn delete_expense(
    controller: &mut AppController,
    id: &str,
    confirmed: bool,
    now: DateTime<Utc>,
) -> Result<Expense, ApiError> {
    let removed = controller
        .state()
        .expenses
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Expense", id))?;
    require_confirmation(confirmed, &format!("expense {}", id))?;

    submit(controller, Command::DeleteExpense(id.to_string()), now);
    info!(id = %id, "Expense deleted");
    Ok(removed)
}

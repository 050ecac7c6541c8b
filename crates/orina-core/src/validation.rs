//! # Validation Module
//!
//! Boundary guards for Orina Operations.
//!
//! ## Where Validation Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Collaborator (console command)                                         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  THIS MODULE: empty cart, missing product, no ingredients, logo size   │
//! │      │  Err ──► ApiError shown to the operator, state untouched         │
//! │      ▼  Ok                                                              │
//! │  AppState::apply (assumes these hold, never fails)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persisted data is never validated here: the store coerces it instead.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::inventory;
use crate::types::{Expense, Formulation, Product, Transaction};
use crate::MAX_LOGO_BYTES;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks a sale before it is recorded.
///
/// ## Rules
/// - At least one line item
pub fn validate_sale(transaction: &Transaction) -> ValidationResult<()> {
    if transaction.items.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(())
}

/// Checks a formulation before it is saved.
///
/// ## Rules
/// - A product must be selected
/// - At least one ingredient
/// - No raw material listed twice
pub fn validate_formulation(formulation: &Formulation) -> ValidationResult<()> {
    if formulation.product_id.trim().is_empty() {
        return Err(ValidationError::required("productId"));
    }

    if formulation.ingredients.is_empty() {
        return Err(ValidationError::NoIngredients {
            product_id: formulation.product_id.clone(),
        });
    }

    let mut seen = HashSet::new();
    for ing in &formulation.ingredients {
        if !seen.insert(ing.item_id.as_str()) {
            return Err(ValidationError::DuplicateIngredient {
                item_id: ing.item_id.clone(),
            });
        }
    }

    Ok(())
}

/// Checks a formulation's product references against the catalog.
///
/// ## Rules
/// - The owner, when in the catalog, must be a finished good
/// - No ingredient may be a finished good
///
/// Ids missing from the catalog pass; they cost zero downstream.
pub fn validate_formulation_products(products: &[Product], formulation: &Formulation) -> ValidationResult<()> {
    let finished = |id: &str| inventory::find_product(products, id).ok().map(Product::is_finished_good);

    if finished(formulation.product_id.as_str()) == Some(false) {
        return Err(ValidationError::NotFinishedGood {
            product_id: formulation.product_id.clone(),
        });
    }

    match formulation
        .ingredients
        .iter()
        .find(|ing| finished(ing.item_id.as_str()) == Some(true))
    {
        Some(ing) => Err(ValidationError::FinishedGoodIngredient {
            item_id: ing.item_id.clone(),
        }),
        None => Ok(()),
    }
}

/// Checks an expense amount is above zero.
pub fn validate_expense(expense: &Expense) -> ValidationResult<()> {
    if !expense.amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Checks an uploaded logo against the size limit.
///
/// ## Example
/// ```rust
/// use orina_core::validation::validate_logo;
///
/// assert!(validate_logo(&[0u8; 1024]).is_ok());
/// assert!(validate_logo(&vec![0u8; 600_000]).is_err());
/// ```
pub fn validate_logo(bytes: &[u8]) -> ValidationResult<()> {
    if bytes.len() > MAX_LOGO_BYTES {
        return Err(ValidationError::LogoTooLarge {
            size: bytes.len(),
            max: MAX_LOGO_BYTES,
        });
    }
    Ok(())
}

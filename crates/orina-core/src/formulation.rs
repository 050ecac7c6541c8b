//! # Formulation Registry
//!
//! One recipe per finished good, upserted wholesale.
//!
//! ## Editor Flow
//! ```text
//! ┌──────────────────┐   add/update/remove   ┌──────────────────┐
//! │ FormulationDraft │ ────────────────────► │ FormulationDraft │
//! │ (product chosen) │   ingredients, steps  │ (ready to save)  │
//! └──────────────────┘                       └────────┬─────────┘
//!                                                     │ validate
//!                                                     ▼
//!                                  into_formulation(existing, now)
//!                                                     │
//!                                                     ▼
//!                               save_formulation(list, f) (upsert by productId)
//! ```
//!
//! Saving is a full replace: ingredients and instructions are never merged
//! with the previous version.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ValidationError;
use crate::types::{Formulation, Ingredient};
use crate::validation;

/// Inserts the formulation, or replaces the one with the same `productId`.
///
/// Keeps at most one formulation per product. The replacement keeps the
/// position of the one it replaces.
pub fn save_formulation(formulations: &[Formulation], formulation: Formulation) -> Vec<Formulation> {
    let mut next = formulations.to_vec();
    match next.iter().position(|f| f.product_id == formulation.product_id) {
        Some(idx) => {
            debug!(product_id = %formulation.product_id, "Replacing formulation");
            next[idx] = formulation;
        }
        None => {
            debug!(product_id = %formulation.product_id, "Adding formulation");
            next.push(formulation);
        }
    }
    next
}

/// Finds the formulation owned by a product.
pub fn formulation_for<'a>(formulations: &'a [Formulation], product_id: &str) -> Option<&'a Formulation> {
    formulations.iter().find(|f| f.product_id == product_id)
}

// =============================================================================
// Editor State
// =============================================================================

/// The formulation being edited before it is saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulationDraft {
    pub product_id: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
}

impl FormulationDraft {
    /// Starts an empty draft for a product.
    pub fn for_product(product_id: impl Into<String>) -> Self {
        FormulationDraft {
            product_id: Some(product_id.into()),
            ..Default::default()
        }
    }

    /// Loads the saved recipe into the editor, if there is one.
    pub fn edit(formulations: &[Formulation], product_id: &str) -> Self {
        match formulation_for(formulations, product_id) {
            Some(f) => FormulationDraft {
                product_id: Some(f.product_id.clone()),
                ingredients: f.ingredients.clone(),
                instructions: f.instructions.clone(),
            },
            None => Self::for_product(product_id),
        }
    }

    /// Adds a raw material with quantity 1. Already listed → ignored.
    pub fn add_ingredient(&mut self, item_id: &str) {
        if self.ingredients.iter().any(|i| i.item_id == item_id) {
            return;
        }
        self.ingredients.push(Ingredient {
            item_id: item_id.to_string(),
            quantity: Decimal::ONE,
        });
    }

    /// Sets the per-unit quantity of a listed ingredient.
    pub fn set_quantity(&mut self, item_id: &str, quantity: Decimal) {
        if let Some(line) = self.ingredients.iter_mut().find(|i| i.item_id == item_id) {
            line.quantity = quantity;
        }
    }

    pub fn remove_ingredient(&mut self, item_id: &str) {
        self.ingredients.retain(|i| i.item_id != item_id);
    }

    /// Appends a preparation step. Blank text is ignored.
    pub fn add_step(&mut self, text: &str) {
        let step = text.trim();
        if !step.is_empty() {
            self.instructions.push(step.to_string());
        }
    }

    /// Removes the step at `index`; out of range is a no-op.
    pub fn remove_step(&mut self, index: usize) {
        if index < self.instructions.len() {
            self.instructions.remove(index);
        }
    }

    /// Validates and turns the draft into a savable formulation.
    ///
    /// An existing formulation for the same product keeps its id; otherwise a
    /// new `FORM-<epoch millis>` id is minted.
    pub fn into_formulation(
        self,
        formulations: &[Formulation],
        now: DateTime<Utc>,
    ) -> Result<Formulation, ValidationError> {
        let product_id = self
            .product_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ValidationError::required("productId"))?;

        let formulation = Formulation {
            id: formulation_for(formulations, &product_id)
                .map(|f| f.id.clone())
                .unwrap_or_else(|| format!("FORM-{}", now.timestamp_millis())),
            product_id,
            ingredients: self.ingredients,
            instructions: self.instructions,
        };
        validation::validate_formulation(&formulation)?;
        Ok(formulation)
    }
}

//! # Formulation Commands
//!
//! Saving a finished good's recipe and printing its costed sheet.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::commands::submit;
use crate::error::ApiError;
use crate::state::AppController;
use orina_core::costing::{self, FormulationSheet};
use orina_core::inventory::find_product;
use orina_core::validation::validate_formulation_products;
use orina_core::{Command, Formulation, FormulationDraft, Ingredient, ValidationError};

/// Replaces the recipe for `product_id`.
///
/// ## Guards
/// - The product must exist and be a finished good
/// - At least one ingredient, none listed twice
/// - No finished good among the ingredients
///
/// Unknown ingredient ids are allowed; they cost zero, the same as a raw
/// material deleted later.
pub fn save_formulation(
    controller: &mut AppController,
    product_id: &str,
    ingredients: &[(String, Decimal)],
    steps: &[String],
    now: DateTime<Utc>,
) -> Result<Formulation, ApiError> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::required("productId").into());
    }
    find_product(&controller.state().products, product_id)?;

    let mut draft = FormulationDraft::for_product(product_id);
    draft.ingredients = ingredients
        .iter()
        .map(|(item_id, quantity)| Ingredient {
            item_id: item_id.clone(),
            quantity: *quantity,
        })
        .collect();
    for step in steps {
        draft.add_step(step);
    }

    for ing in &draft.ingredients {
        if controller.state().product(&ing.item_id).is_none() {
            warn!(product_id = %product_id, item_id = %ing.item_id, "Ingredient is not in the catalog");
        }
    }

    let formulation = draft.into_formulation(&controller.state().formulations, now)?;
    validate_formulation_products(&controller.state().products, &formulation)?;
    submit(controller, Command::SaveFormulation(formulation.clone()), now);

    info!(
        product_id = %product_id,
        ingredients = formulation.ingredients.len(),
        "Formulation saved"
    );
    Ok(formulation)
}

/// The priced recipe for a product.
pub fn formulation_sheet(controller: &AppController, product_id: &str) -> Result<FormulationSheet, ApiError> {
    Ok(costing::formulation_sheet(controller.state(), product_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seeded_controller;
    use crate::error::ErrorCode;
    use orina_core::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_save_replaces_existing() {
        let (_dir, mut controller, now) = seeded_controller();

        let saved = save_formulation(
            &mut controller,
            "fg-1",
            &[("rm-1".to_string(), dec!(0.2)), ("rm-3".to_string(), dec!(1))],
            &["Mix".to_string(), "  ".to_string()],
            now,
        )
        .unwrap();

        assert_eq!(saved.id, "form-1");
        assert_eq!(saved.instructions, vec!["Mix".to_string()]);
        assert_eq!(controller.state().formulations.len(), 1);

        let sheet = formulation_sheet(&controller, "fg-1").unwrap();
        // 0.2 x 140 + 1 x 35
        assert_eq!(sheet.total_cost, Money::from_major(63));
    }

    #[test]
    fn test_new_recipe_gets_fresh_id() {
        let (_dir, mut controller, now) = seeded_controller();

        let saved = save_formulation(&mut controller, "fg-2", &[("rm-2".to_string(), dec!(0.1))], &[], now).unwrap();

        assert_eq!(saved.id, format!("FORM-{}", now.timestamp_millis()));
        assert_eq!(controller.state().formulations.len(), 2);
    }

    #[test]
    fn test_guards() {
        let (_dir, mut controller, now) = seeded_controller();

        let err = save_formulation(&mut controller, "fg-1", &[], &[], now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let dup = [("rm-1".to_string(), dec!(1)), ("rm-1".to_string(), dec!(2))];
        let err = save_formulation(&mut controller, "fg-1", &dup, &[], now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = save_formulation(&mut controller, "fg-9", &dup[..1], &[], now).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        // Nothing was dispatched.
        assert_eq!(controller.state().formulations[0].ingredients.len(), 5);
    }

    #[test]
    fn test_recipes_belong_to_finished_goods_and_use_raw_materials() {
        let (_dir, mut controller, now) = seeded_controller();

        let err = save_formulation(&mut controller, "rm-1", &[("rm-3".to_string(), dec!(1))], &[], now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let nested = [("rm-1".to_string(), dec!(0.2)), ("fg-2".to_string(), dec!(1))];
        let err = save_formulation(&mut controller, "fg-1", &nested, &[], now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(controller.state().formulations.len(), 1);
        assert!(controller.state().formulations.iter().all(|f| f.product_id == "fg-1"));
        assert_eq!(controller.state().formulations[0].ingredients.len(), 5);
    }

    #[test]
    fn test_sheet_for_product_without_recipe() {
        let (_dir, controller, _) = seeded_controller();
        let sheet = formulation_sheet(&controller, "fg-2").unwrap();
        assert!(sheet.lines.is_empty());
        assert_eq!(sheet.total_cost, Money::zero());
        assert_eq!(sheet.retail_margin, Money::from_major(180));
    }
}

//! # Costing Engine
//!
//! Derives the cost of a finished good from its bill of materials.
//!
//! ## How a Cost is Derived
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Premium Mango Juice 1L (fg-1)                                          │
//! │       │                                                                 │
//! │       ▼ formulation lookup (by productId)                               │
//! │  ┌───────────────────────────┬──────────┬────────────┬────────────┐    │
//! │  │ ingredient                │ qty/unit │ costPrice  │ line cost  │    │
//! │  ├───────────────────────────┼──────────┼────────────┼────────────┤    │
//! │  │ rm-1 Refined Sugar        │   0.15   │    140     │   21.00    │    │
//! │  │ rm-2 Mango Pulp           │   0.2    │    450     │   90.00    │    │
//! │  │ rm-3 PET Bottle 1L        │   1      │     35     │   35.00    │    │
//! │  │ rm-9 (deleted)            │   2      │   ── 0 ──  │    0.00    │    │
//! │  └───────────────────────────┴──────────┴────────────┴────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cost = 146.00                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Never Cached
//! Raw-material prices change independently of recipes, so every read
//! (dashboard, inventory listing, reports, recipe sheet) recomputes. There is
//! no invalidation to get wrong.
//!
//! ## Single Level
//! An ingredient that is itself a finished good contributes zero. Recipes do
//! not nest, so there is no cycle to detect.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::state::AppState;
use crate::types::{Ingredient, Product, SaleChannel};

/// Label used for an ingredient whose product no longer exists.
pub const UNKNOWN_ITEM: &str = "Unknown item";

/// Cost of one unit of a finished good.
///
/// Returns zero when the product has no formulation.
///
/// ## Example
/// ```rust,ignore
/// let cost = cost_of_finished_good(&state, "fg-1");
/// ```
pub fn cost_of_finished_good(state: &AppState, product_id: &str) -> Money {
    match state.formulation_for(product_id) {
        Some(formulation) => cost_of_ingredients(&state.products, &formulation.ingredients),
        None => Money::zero(),
    }
}

/// Cost of an ingredient list that may not be saved yet.
///
/// The formulation editor previews this while lines are being added.
pub fn cost_of_ingredients(products: &[Product], ingredients: &[Ingredient]) -> Money {
    ingredients
        .iter()
        .map(|ing| ingredient_unit_cost(products, &ing.item_id).times(ing.quantity))
        .sum()
}

/// Cost of one unit of any product, as used by profit reports.
///
/// ```text
/// finished good  → derived from its formulation
/// raw material   → stored costPrice
/// unknown id     → 0
/// ```
pub fn unit_cost(state: &AppState, product_id: &str) -> Money {
    match state.product(product_id) {
        Some(product) if product.is_finished_good() => cost_of_finished_good(state, product_id),
        Some(product) => product.cost_price,
        None => Money::zero(),
    }
}

/// Selling price on a channel minus the current unit cost.
pub fn margin(state: &AppState, product_id: &str, channel: SaleChannel) -> Money {
    match state.product(product_id) {
        Some(product) => product.price_for(channel) - unit_cost(state, product_id),
        None => Money::zero(),
    }
}

fn ingredient_unit_cost(products: &[Product], item_id: &str) -> Money {
    match products.iter().find(|p| p.id == item_id) {
        Some(p) if !p.is_finished_good() => p.cost_price,
        _ => Money::zero(),
    }
}

// =============================================================================
// Recipe Sheet
// =============================================================================

/// One priced ingredient row of a recipe sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub item_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub unit_cost: Money,
    pub line_cost: Money,
}

/// A finished good's recipe with every line priced at current cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulationSheet {
    pub product_id: String,
    pub product_name: String,
    pub lines: Vec<CostLine>,
    pub instructions: Vec<String>,
    pub total_cost: Money,
    pub retail_margin: Money,
    pub wholesale_margin: Money,
}

/// Builds the recipe sheet for a product.
///
/// A product without a formulation yields an empty sheet with zero cost.
///
/// ## Errors
/// `CoreError::ProductNotFound` when the product id is unknown.
pub fn formulation_sheet(state: &AppState, product_id: &str) -> CoreResult<FormulationSheet> {
    let product = state
        .product(product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    let (lines, instructions) = match state.formulation_for(product_id) {
        Some(formulation) => {
            let lines = formulation
                .ingredients
                .iter()
                .map(|ing| {
                    let unit_cost = ingredient_unit_cost(&state.products, &ing.item_id);
                    CostLine {
                        item_id: ing.item_id.clone(),
                        name: state
                            .product(&ing.item_id)
                            .map(|p| p.name.clone())
                            .unwrap_or_else(|| UNKNOWN_ITEM.to_string()),
                        quantity: ing.quantity,
                        unit_cost,
                        line_cost: unit_cost.times(ing.quantity),
                    }
                })
                .collect::<Vec<_>>();
            (lines, formulation.instructions.clone())
        }
        None => (Vec::new(), Vec::new()),
    };

    let total_cost: Money = lines.iter().map(|l| l.line_cost).sum();

    Ok(FormulationSheet {
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        lines,
        instructions,
        total_cost,
        retail_margin: product.retail_price - total_cost,
        wholesale_margin: product.wholesale_price - total_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{finished_good, formulation, raw_material, state_with};
    use rust_decimal_macros::dec;

    #[test]
    fn test_cost_is_weighted_sum_of_ingredients() {
        let state = state_with(
            vec![
                raw_material("rm-1", 140, dec!(500)),
                raw_material("rm-2", 450, dec!(200)),
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation("fg-1", &[("rm-1", dec!(0.15)), ("rm-2", dec!(0.2))])],
        );

        assert_eq!(cost_of_finished_good(&state, "fg-1"), Money::new(dec!(111)));
    }

    #[test]
    fn test_no_formulation_costs_zero() {
        let state = state_with(vec![finished_good("fg-1", 350, 280, dec!(45))], vec![]);
        assert!(cost_of_finished_good(&state, "fg-1").is_zero());
        assert!(cost_of_finished_good(&state, "missing").is_zero());
    }

    #[test]
    fn test_dangling_and_finished_good_ingredients_cost_zero() {
        let mut nested = finished_good("fg-2", 180, 140, dec!(100));
        nested.cost_price = Money::from_major(999);

        let state = state_with(
            vec![
                raw_material("rm-3", 35, dec!(1000)),
                nested,
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation(
                "fg-1",
                &[("rm-3", dec!(1)), ("fg-2", dec!(2)), ("rm-deleted", dec!(3))],
            )],
        );

        assert_eq!(cost_of_finished_good(&state, "fg-1"), Money::from_major(35));
    }

    #[test]
    fn test_cost_follows_current_raw_material_price() {
        let mut state = state_with(
            vec![
                raw_material("rm-1", 140, dec!(500)),
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation("fg-1", &[("rm-1", dec!(2))])],
        );
        assert_eq!(cost_of_finished_good(&state, "fg-1"), Money::from_major(280));

        state.products[0].cost_price = Money::from_major(150);
        assert_eq!(cost_of_finished_good(&state, "fg-1"), Money::from_major(300));
    }

    #[test]
    fn test_unit_cost_by_kind() {
        let state = state_with(
            vec![
                raw_material("rm-1", 140, dec!(500)),
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation("fg-1", &[("rm-1", dec!(0.5))])],
        );

        assert_eq!(unit_cost(&state, "rm-1"), Money::from_major(140));
        assert_eq!(unit_cost(&state, "fg-1"), Money::from_major(70));
        assert!(unit_cost(&state, "nope").is_zero());
        assert_eq!(margin(&state, "fg-1", SaleChannel::Wholesale), Money::from_major(210));
    }

    #[test]
    fn test_formulation_sheet() {
        let state = state_with(
            vec![
                raw_material("rm-1", 140, dec!(500)),
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation("fg-1", &[("rm-1", dec!(0.5)), ("rm-x", dec!(1))])],
        );

        let sheet = formulation_sheet(&state, "fg-1").unwrap();
        assert_eq!(sheet.lines.len(), 2);
        assert_eq!(sheet.lines[0].line_cost, Money::from_major(70));
        assert_eq!(sheet.lines[1].name, UNKNOWN_ITEM);
        assert_eq!(sheet.total_cost, Money::from_major(70));
        assert_eq!(sheet.retail_margin, Money::from_major(280));

        assert!(matches!(
            formulation_sheet(&state, "fg-404"),
            Err(CoreError::ProductNotFound(_))
        ));
    }
}

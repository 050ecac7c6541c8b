//! # Product Commands
//!
//! Inventory listing and catalog maintenance.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Update Flow                                  │
//! │                                                                         │
//! │  orina product update rm-1 --cost 150                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductDraft::from_product(existing)   ◄── form pre-filled            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductChanges::apply(draft)           ◄── only the given flags       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  draft.apply_to(existing, ...)          ◄── id kept, category rules    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Command::UpdateProduct(product)        ◄── lastUpdated stamped        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::commands::{require_confirmation, submit};
use crate::error::ApiError;
use crate::state::AppController;
use orina_core::inventory::{self, find_product};
use orina_core::{Command, InventoryFilter, InventoryRow, Money, Product, ProductDraft, ProductKind};

/// Fields supplied on `product update`. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub kind: Option<ProductKind>,
    pub name: Option<String>,
    pub sku: Option<String>,
    pub stock: Option<Decimal>,
    pub min_stock_alert: Option<Decimal>,
    pub cost_price: Option<Money>,
    pub retail_price: Option<Money>,
    pub wholesale_price: Option<Money>,
}

impl ProductChanges {
    fn apply(self, mut draft: ProductDraft) -> ProductDraft {
        if let Some(kind) = self.kind {
            draft.kind = kind;
        }
        draft.name = self.name.or(draft.name);
        draft.sku = self.sku.or(draft.sku);
        draft.stock = self.stock.or(draft.stock);
        draft.min_stock_alert = self.min_stock_alert.or(draft.min_stock_alert);
        draft.cost_price = self.cost_price.or(draft.cost_price);
        draft.retail_price = self.retail_price.or(draft.retail_price);
        draft.wholesale_price = self.wholesale_price.or(draft.wholesale_price);
        draft
    }
}

/// Inventory rows matching the filter, with derived unit costs.
pub fn list_products(controller: &AppController, filter: &InventoryFilter) -> Vec<InventoryRow> {
    let rows = inventory::inventory_view(controller.state(), filter);
    debug!(count = rows.len(), search = %filter.search, "Listed products");
    rows
}

/// Adds a product and returns it as stored.
pub fn add_product(
    controller: &mut AppController,
    draft: ProductDraft,
    now: DateTime<Utc>,
) -> Result<Product, ApiError> {
    submit(controller, Command::AddProduct(draft), now);

    let product = controller
        .state()
        .products
        .last()
        .cloned()
        .ok_or_else(|| ApiError::internal("Product was not added"))?;

    info!(id = %product.id, sku = %product.sku, "Product added");
    Ok(product)
}

/// Re-applies the given fields to an existing product.
pub fn update_product(
    controller: &mut AppController,
    id: &str,
    changes: ProductChanges,
    now: DateTime<Utc>,
) -> Result<Product, ApiError> {
    let state = controller.state();
    let existing = find_product(&state.products, id)?;

    let draft = changes.apply(ProductDraft::from_product(existing));
    let updated = draft.apply_to(existing, &state.products, now);

    submit(controller, Command::UpdateProduct(updated), now);

    let product = find_product(&controller.state().products, id)?.clone();
    info!(id = %product.id, "Product updated");
    Ok(product)
}

/// Removes a product. Recipes and invoices that mention it keep the id.
pub fn delete_product(
    controller: &mut AppController,
    id: &str,
    confirmed: bool,
    now: DateTime<Utc>,
) -> Result<Product, ApiError> {
    let removed = find_product(&controller.state().products, id)?.clone();
    require_confirmation(confirmed, &format!("product {}", removed.name))?;

    submit(controller, Command::DeleteProduct(id.to_string()), now);
    info!(id = %id, "Product deleted");
    Ok(removed)
}

/// Everything at or below its reorder threshold.
pub fn low_stock(controller: &AppController) -> Vec<Product> {
    inventory::low_stock(&controller.state().products)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::seeded_controller;
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_list_filters_and_derives_cost() {
        let (_dir, controller, _) = seeded_controller();

        let filter = InventoryFilter {
            kind: Some(ProductKind::FinishedGood),
            search: "mango".to_string(),
        };
        let rows = list_products(&controller, &filter);

        assert_eq!(rows.len(), 2);
        let juice = rows.iter().find(|r| r.id == "fg-1").unwrap();
        assert_eq!(juice.unit_cost, Money::from_major(160));
    }

    #[test]
    fn test_add_returns_stored_product() {
        let (_dir, mut controller, now) = seeded_controller();

        let mut draft = ProductDraft::new(ProductKind::RawMaterial);
        draft.name = Some("Caramel Color".to_string());
        draft.cost_price = Some(Money::from_major(900));
        draft.retail_price = Some(Money::from_major(1500));
        let product = add_product(&mut controller, draft, now).unwrap();

        assert_eq!(product.name, "Caramel Color");
        assert!(product.sku.starts_with("RM-"));
        assert_eq!(product.retail_price, Money::zero());
        assert!(controller.state().product(&product.id).is_some());
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let (_dir, mut controller, now) = seeded_controller();

        let changes = ProductChanges {
            cost_price: Some(Money::from_major(150)),
            ..Default::default()
        };
        let product = update_product(&mut controller, "rm-1", changes, now).unwrap();

        assert_eq!(product.cost_price, Money::from_major(150));
        assert_eq!(product.name, "Refined Sugar (Cheeni)");
        assert_eq!(product.sku, "RM-1001");
        assert_eq!(product.stock, dec!(500));
        assert_eq!(product.last_updated, now);
    }

    #[test]
    fn test_update_unknown_product() {
        let (_dir, mut controller, now) = seeded_controller();
        let err = update_product(&mut controller, "rm-999", ProductChanges::default(), now).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (_dir, mut controller, now) = seeded_controller();

        let err = delete_product(&mut controller, "rm-5", false, now).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfirmationRequired);
        assert!(controller.state().product("rm-5").is_some());

        delete_product(&mut controller, "rm-5", true, now).unwrap();
        assert!(controller.state().product("rm-5").is_none());
        // The recipe still references the deleted ingredient.
        assert!(controller.state().formulations[0]
            .ingredients
            .iter()
            .any(|i| i.item_id == "rm-5"));
    }

    #[test]
    fn test_low_stock_after_sale_pressure() {
        let (_dir, mut controller, now) = seeded_controller();
        let before = low_stock(&controller).len();

        let changes = ProductChanges {
            stock: Some(dec!(3)),
            ..Default::default()
        };
        update_product(&mut controller, "fg-2", changes, now).unwrap();

        let alerts = low_stock(&controller);
        assert_eq!(alerts.len(), before + 1);
        assert!(alerts.iter().any(|p| p.id == "fg-2"));
    }
}

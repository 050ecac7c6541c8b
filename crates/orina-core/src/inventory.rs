//! # Inventory Ledger
//!
//! Owns the product catalog and stock quantities.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Catalog Transitions                                  │
//! │                                                                         │
//! │  add_product(draft) ───────► products ++ [new id, SKU, lastUpdated]    │
//! │                                                                         │
//! │  update_product(p) ────────► products[id == p.id] = p (stamped)        │
//! │                              no match → unchanged                       │
//! │                                                                         │
//! │  delete_product(id) ───────► products − [id]                           │
//! │                              formulations / invoices NOT touched        │
//! │                                                                         │
//! │  apply_sale_deductions ────► stock −= Σ line quantity                  │
//! │                              unknown ids skipped, negatives allowed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function takes the current slice and returns a fresh `Vec`; nothing
//! here mutates a list that another part of the state can still see.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::costing;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::state::AppState;
use crate::types::{LineItem, Product, ProductKind};
use crate::{DEFAULT_MIN_STOCK_ALERT, UNNAMED_ITEM};

/// How many random SKUs to try before accepting a collision.
const SKU_ATTEMPTS: usize = 64;

// =============================================================================
// Product Draft
// =============================================================================

/// The product form as a collaborator submits it.
///
/// Every field is optional; missing values take the catalog defaults
/// (placeholder name, zero amounts, reorder threshold of 5, generated SKU).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub kind: ProductKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: Option<Decimal>,
    #[serde(default)]
    pub min_stock_alert: Option<Decimal>,
    #[serde(default)]
    pub cost_price: Option<Money>,
    #[serde(default)]
    pub retail_price: Option<Money>,
    #[serde(default)]
    pub wholesale_price: Option<Money>,
}

impl ProductDraft {
    /// An empty form for the given product family.
    pub fn new(kind: ProductKind) -> Self {
        ProductDraft {
            kind,
            name: None,
            sku: None,
            stock: None,
            min_stock_alert: None,
            cost_price: None,
            retail_price: None,
            wholesale_price: None,
        }
    }

    /// Pre-fills the form from an existing product (the edit screen).
    pub fn from_product(product: &Product) -> Self {
        ProductDraft {
            kind: product.kind(),
            name: Some(product.name.clone()),
            sku: Some(product.sku.clone()),
            stock: Some(product.stock),
            min_stock_alert: Some(product.min_stock_alert),
            cost_price: Some(product.cost_price),
            retail_price: Some(product.retail_price),
            wholesale_price: Some(product.wholesale_price),
        }
    }

    /// Builds a brand new product with a fresh id.
    ///
    /// ## Category Rules
    /// - Raw material: cost kept, retail/wholesale forced to 0
    /// - Finished good: retail/wholesale kept, cost forced to 0 (derived)
    pub fn into_product(self, catalog: &[Product], now: DateTime<Utc>) -> Product {
        let id = Uuid::new_v4().to_string();
        self.build(id, catalog, now)
    }

    /// Re-applies the form onto an existing product (the edit flow).
    ///
    /// Keeps the id, and keeps the SKU unless the form supplies one. A custom
    /// raw-material category such as "Packaging" survives when the family is
    /// unchanged.
    pub fn apply_to(self, existing: &Product, catalog: &[Product], now: DateTime<Utc>) -> Product {
        let mut draft = self;
        if draft.sku.as_deref().map_or(true, |s| s.trim().is_empty()) {
            draft.sku = Some(existing.sku.clone());
        }
        let same_family = draft.kind == existing.kind();

        let mut product = draft.build(existing.id.clone(), catalog, now);
        if same_family {
            product.category = existing.category.clone();
        }
        product
    }

    fn build(self, id: String, catalog: &[Product], now: DateTime<Utc>) -> Product {
        let kind = self.kind;
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNNAMED_ITEM.to_string());
        let sku = self
            .sku
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| unique_sku(catalog, kind, &mut rand::thread_rng()));

        let (cost_price, retail_price, wholesale_price) = match kind {
            ProductKind::RawMaterial => (
                self.cost_price.unwrap_or_default(),
                Money::zero(),
                Money::zero(),
            ),
            ProductKind::FinishedGood => (
                Money::zero(),
                self.retail_price.unwrap_or_default(),
                self.wholesale_price.unwrap_or_default(),
            ),
        };

        Product {
            id,
            name,
            sku,
            stock: self.stock.unwrap_or_default(),
            min_stock_alert: self
                .min_stock_alert
                .unwrap_or_else(|| Decimal::from(DEFAULT_MIN_STOCK_ALERT)),
            cost_price,
            retail_price,
            wholesale_price,
            category: kind.category().to_string(),
            last_updated: now,
        }
    }
}

// =============================================================================
// SKU Generation
// =============================================================================

/// Generates `<FG|RM>-<1000..=9999>`.
pub fn generate_sku<R: Rng + ?Sized>(kind: ProductKind, rng: &mut R) -> String {
    format!("{}-{}", kind.sku_prefix(), rng.gen_range(1000..=9999))
}

/// Generates a SKU not already used in the catalog.
///
/// With only 9,000 codes per family a collision is possible; after a bounded
/// number of attempts the last candidate is accepted.
pub fn unique_sku<R: Rng + ?Sized>(catalog: &[Product], kind: ProductKind, rng: &mut R) -> String {
    let mut candidate = generate_sku(kind, rng);
    for _ in 0..SKU_ATTEMPTS {
        if !catalog.iter().any(|p| p.sku == candidate) {
            break;
        }
        candidate = generate_sku(kind, rng);
    }
    candidate
}

// =============================================================================
// Catalog Transitions
// =============================================================================

/// Appends a new product built from the draft.
pub fn add_product(products: &[Product], draft: ProductDraft, now: DateTime<Utc>) -> Vec<Product> {
    let product = draft.into_product(products, now);
    debug!(id = %product.id, sku = %product.sku, "Adding product");

    let mut next = products.to_vec();
    next.push(product);
    next
}

/// Replaces the product with a matching id and stamps `lastUpdated`.
///
/// An unknown id leaves the catalog unchanged.
pub fn update_product(products: &[Product], updated: Product, now: DateTime<Utc>) -> Vec<Product> {
    if !products.iter().any(|p| p.id == updated.id) {
        debug!(id = %updated.id, "Update for unknown product ignored");
        return products.to_vec();
    }

    let stamped = Product {
        last_updated: now,
        ..updated
    };
    products
        .iter()
        .map(|p| if p.id == stamped.id { stamped.clone() } else { p.clone() })
        .collect()
}

/// Removes a product. References from formulations and invoices are left
/// dangling and resolve to zero downstream.
pub fn delete_product(products: &[Product], id: &str) -> Vec<Product> {
    products.iter().filter(|p| p.id != id).cloned().collect()
}

/// Decrements stock for every sale line that matches a product.
///
/// Lines for deleted products are skipped. There is no insufficient-stock
/// check: a sale is always recorded and negative stock shows up as a reorder
/// alert instead. Stock saturates at the `Decimal` bounds.
pub fn apply_sale_deductions(products: &[Product], items: &[LineItem]) -> Vec<Product> {
    products
        .iter()
        .map(|p| {
            let sold: Decimal = items
                .iter()
                .filter(|i| i.product_id == p.id)
                .fold(Decimal::ZERO, |acc, i| acc.saturating_add(i.quantity));
            if sold.is_zero() {
                p.clone()
            } else {
                Product {
                    stock: p.stock.saturating_sub(sold),
                    ..p.clone()
                }
            }
        })
        .collect()
}

/// Looks up a product by id.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> CoreResult<&'a Product> {
    products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
}

// =============================================================================
// Read Models
// =============================================================================

/// Products at or below their reorder threshold, in catalog order.
pub fn low_stock(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.needs_reorder()).collect()
}

/// Filter for the inventory listing.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Restrict to one product family.
    pub kind: Option<ProductKind>,
    /// Case-insensitive match against name or SKU.
    pub search: String,
}

/// One row of the inventory listing, with the current unit cost.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub kind: ProductKind,
    pub stock: Decimal,
    pub min_stock_alert: Decimal,
    pub unit_cost: Money,
    pub retail_price: Money,
    pub wholesale_price: Money,
    pub needs_reorder: bool,
}

/// Builds the inventory listing. Finished-good costs are derived on the fly.
pub fn inventory_view(state: &AppState, filter: &InventoryFilter) -> Vec<InventoryRow> {
    let needle = filter.search.trim().to_lowercase();

    state
        .products
        .iter()
        .filter(|p| filter.kind.map_or(true, |k| p.kind() == k))
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.sku.to_lowercase().contains(&needle)
        })
        .map(|p| InventoryRow {
            id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone(),
            kind: p.kind(),
            stock: p.stock,
            min_stock_alert: p.min_stock_alert,
            unit_cost: costing::unit_cost(state, &p.id),
            retail_price: p.retail_price,
            wholesale_price: p.wholesale_price,
            needs_reorder: p.needs_reorder(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{finished_good, formulation, raw_material, state_with, t0};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    fn line(product_id: &str, quantity: Decimal) -> LineItem {
        LineItem {
            product_id: product_id.to_string(),
            quantity,
            price: Money::from_major(350),
            name: "Premium Mango Juice 1L".to_string(),
        }
    }

    #[test]
    fn test_add_product_applies_defaults() {
        let products = add_product(&[], ProductDraft::new(ProductKind::RawMaterial), t0());
        assert_eq!(products.len(), 1);

        let p = &products[0];
        assert_eq!(p.name, UNNAMED_ITEM);
        assert_eq!(p.category, "Raw Material");
        assert_eq!(p.min_stock_alert, dec!(5));
        assert!(p.stock.is_zero());
        assert!(p.sku.starts_with("RM-"));
        assert_eq!(p.last_updated, t0());
        assert!(!p.id.is_empty());
    }

    #[test]
    fn test_add_product_zeroes_prices_not_owned_by_category() {
        let mut draft = ProductDraft::new(ProductKind::FinishedGood);
        draft.name = Some("Mango Nectar 500ml".to_string());
        draft.cost_price = Some(Money::from_major(99));
        draft.retail_price = Some(Money::from_major(180));
        draft.wholesale_price = Some(Money::from_major(140));

        let products = add_product(&[], draft, t0());
        let p = &products[0];
        assert!(p.is_finished_good());
        assert!(p.cost_price.is_zero());
        assert_eq!(p.retail_price, Money::from_major(180));
        assert!(p.sku.starts_with("FG-"));
    }

    #[test]
    fn test_add_preserves_existing_products() {
        let existing = vec![raw_material("rm-1", 140, dec!(500))];
        let products = add_product(&existing, ProductDraft::new(ProductKind::RawMaterial), t0());
        assert_eq!(products.len(), 2);
        assert_eq!(products[0], existing[0]);
    }

    #[test]
    fn test_update_replaces_and_stamps() {
        let products = vec![
            raw_material("rm-1", 140, dec!(500)),
            raw_material("rm-2", 450, dec!(200)),
        ];
        let mut edited = products[1].clone();
        edited.cost_price = Money::from_major(470);

        let later = t0() + chrono::Duration::hours(1);
        let next = update_product(&products, edited, later);

        assert_eq!(next[0], products[0]);
        assert_eq!(next[1].cost_price, Money::from_major(470));
        assert_eq!(next[1].last_updated, later);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let products = vec![raw_material("rm-1", 140, dec!(500))];
        let ghost = raw_material("rm-404", 1, dec!(1));
        assert_eq!(update_product(&products, ghost, t0()), products);
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let state = state_with(
            vec![
                raw_material("rm-1", 140, dec!(500)),
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation("fg-1", &[("rm-1", dec!(1))])],
        );

        let products = delete_product(&state.products, "rm-1");
        assert_eq!(products.len(), 1);
        // The formulation still references rm-1; costing treats it as zero.
        assert_eq!(state.formulations[0].ingredients[0].item_id, "rm-1");
    }

    #[test]
    fn test_sale_deductions() {
        let products = vec![
            finished_good("fg-1", 350, 280, dec!(10)),
            finished_good("fg-2", 180, 140, dec!(100)),
        ];

        let next = apply_sale_deductions(&products, &[line("fg-1", dec!(3)), line("gone", dec!(5))]);
        assert_eq!(next[0].stock, dec!(7));
        assert_eq!(next[1].stock, dec!(100));
    }

    #[test]
    fn test_sale_deductions_allow_negative_stock() {
        let products = vec![finished_good("fg-1", 350, 280, dec!(10))];
        let next = apply_sale_deductions(&products, &[line("fg-1", dec!(15))]);
        assert_eq!(next[0].stock, dec!(-5));
    }

    #[test]
    fn test_sale_deductions_saturate_on_huge_quantities() {
        let products = vec![finished_good("fg-1", 350, 280, dec!(-10))];
        let next = apply_sale_deductions(
            &products,
            &[line("fg-1", Decimal::MAX), line("fg-1", Decimal::MAX)],
        );
        assert_eq!(next[0].stock, Decimal::MIN);
    }

    #[test]
    fn test_generated_sku_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let sku = generate_sku(ProductKind::FinishedGood, &mut rng);
            let (prefix, digits) = sku.split_once('-').unwrap();
            assert_eq!(prefix, "FG");
            let n: u32 = digits.parse().unwrap();
            assert!((1000..=9999).contains(&n));
        }
    }

    #[test]
    fn test_edit_keeps_id_and_sku() {
        let existing = raw_material("rm-1", 140, dec!(500));
        let mut draft = ProductDraft::new(ProductKind::RawMaterial);
        draft.name = Some("Refined Sugar".to_string());
        draft.cost_price = Some(Money::from_major(145));

        let edited = draft.apply_to(&existing, &[existing.clone()], t0());
        assert_eq!(edited.id, "rm-1");
        assert_eq!(edited.sku, existing.sku);
        assert_eq!(edited.cost_price, Money::from_major(145));
    }

    #[test]
    fn test_low_stock_and_view() {
        let state = state_with(
            vec![
                raw_material("rm-1", 140, dec!(3)),
                finished_good("fg-1", 350, 280, dec!(45)),
            ],
            vec![formulation("fg-1", &[("rm-1", dec!(0.5))])],
        );

        let alerts = low_stock(&state.products);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "rm-1");

        let finished = inventory_view(
            &state,
            &InventoryFilter {
                kind: Some(ProductKind::FinishedGood),
                search: String::new(),
            },
        );
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].unit_cost, Money::from_major(70));

        let searched = inventory_view(
            &state,
            &InventoryFilter {
                kind: None,
                search: "RM-".to_string(),
            },
        );
        assert_eq!(searched.len(), 1);
        assert!(searched[0].needs_reorder);
    }

    #[test]
    fn test_find_product() {
        let products = vec![raw_material("rm-1", 140, dec!(500))];
        assert!(find_product(&products, "rm-1").is_ok());
        assert!(matches!(
            find_product(&products, "rm-2"),
            Err(CoreError::ProductNotFound(_))
        ));
    }
}

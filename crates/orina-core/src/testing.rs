//! Fixtures shared by the unit tests in this crate.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::money::Money;
use crate::state::AppState;
use crate::types::{Formulation, Ingredient, Product, ProductKind};

/// A fixed instant: 2024-03-15 10:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
}

pub fn raw_material(id: &str, cost: i64, stock: Decimal) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Material {}", id),
        sku: format!("RM-{}", id),
        stock,
        min_stock_alert: Decimal::from(5),
        cost_price: Money::from_major(cost),
        retail_price: Money::zero(),
        wholesale_price: Money::zero(),
        category: ProductKind::RawMaterial.category().to_string(),
        last_updated: t0(),
    }
}

pub fn finished_good(id: &str, retail: i64, wholesale: i64, stock: Decimal) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        sku: format!("FG-{}", id),
        stock,
        min_stock_alert: Decimal::from(10),
        cost_price: Money::zero(),
        retail_price: Money::from_major(retail),
        wholesale_price: Money::from_major(wholesale),
        category: ProductKind::FinishedGood.category().to_string(),
        last_updated: t0(),
    }
}

pub fn formulation(product_id: &str, lines: &[(&str, Decimal)]) -> Formulation {
    Formulation {
        id: format!("form-{}", product_id),
        product_id: product_id.to_string(),
        ingredients: lines
            .iter()
            .map(|(item_id, quantity)| Ingredient {
                item_id: item_id.to_string(),
                quantity: *quantity,
            })
            .collect(),
        instructions: Vec::new(),
    }
}

pub fn state_with(products: Vec<Product>, formulations: Vec<Formulation>) -> AppState {
    AppState {
        products,
        formulations,
        ..AppState::default()
    }
}

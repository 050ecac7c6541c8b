//! # Document Migration
//!
//! Turns whatever is on disk into a well-formed [`AppState`].
//!
//! ## How Sanitization Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Load Pipeline                                      │
//! │                                                                         │
//! │  raw JSON (serde_json::Value)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  collections ── not an array? ──► []                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  each record ── field by field ──► coerce_* with a documented default  │
//! │       │          stock, costPrice, totalAmount …   → number or 0       │
//! │       │          minStockAlert                     → number or 5       │
//! │       │          retail/wholesale missing          → legacy sellingPrice│
//! │       │          saleType                          → WHOLESALE or RETAIL│
//! │       ▼                                                                 │
//! │  settings merged over defaults                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  currentUser forced to the fixed identity                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no schema version: every load runs every rule, and every rule is
//! idempotent on data that is already well formed. A value that had to be
//! coerced is logged at `warn`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use orina_core::{
    AppSettings, AppState, Expense, Formulation, Ingredient, Language, LineItem, Money,
    PaymentStatus, Product, SaleChannel, Transaction, TransactionType, User,
    DEFAULT_MIN_STOCK_ALERT, RAW_MATERIAL_CATEGORY, UNNAMED_ITEM, WALK_IN_CUSTOMER,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

// =============================================================================
// Entry Point
// =============================================================================

/// Sanitizes a parsed document into a state tree.
///
/// Keys the document lacks take their defaults. A root that is not an object
/// behaves like an empty object.
pub fn sanitize(doc: &Value) -> AppState {
    let empty = Map::new();
    let root = doc.as_object().unwrap_or(&empty);

    AppState {
        current_user: User::default_identity(),
        products: collection(root, "products", sanitize_product),
        transactions: collection(root, "transactions", sanitize_transaction),
        expenses: collection(root, "expenses", sanitize_expense),
        formulations: collection(root, "formulations", sanitize_formulation),
        settings: sanitize_settings(root.get("settings")),
    }
}

/// Maps every object element of an array field; anything else becomes `[]`.
fn collection<T>(root: &Map<String, Value>, key: &str, f: fn(&Map<String, Value>) -> T) -> Vec<T> {
    match root.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item.as_object() {
                Some(obj) => Some(f(obj)),
                None => {
                    warn!(collection = key, "Dropping non-object record");
                    None
                }
            })
            .collect(),
        Some(other) if !other.is_null() => {
            warn!(collection = key, "Collection is not an array, resetting to empty");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

// =============================================================================
// Field Coercions
// =============================================================================

/// Reads a number or numeric string.
///
/// Blank strings, booleans, null, objects and unparsable text yield `None`.
pub fn coerce_number(value: Option<&Value>) -> Option<Decimal> {
    match value? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                parse_decimal(s)
            }
        }
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// A number, or `default` when the value is missing or not numeric.
pub fn number_or(obj: &Map<String, Value>, key: &str, default: Decimal) -> Decimal {
    match coerce_number(obj.get(key)) {
        Some(n) => n,
        None => {
            if obj.get(key).map_or(false, |v| !v.is_null()) {
                warn!(field = key, value = %obj[key], "Non-numeric value coerced to default");
            }
            default
        }
    }
}

/// A monetary amount, 0 when missing or not numeric.
pub fn money_or_zero(obj: &Map<String, Value>, key: &str) -> Money {
    Money::new(number_or(obj, key, Decimal::ZERO))
}

/// Reorder threshold; missing or not numeric → 5.
pub fn coerce_min_stock_alert(obj: &Map<String, Value>) -> Decimal {
    number_or(obj, "minStockAlert", Decimal::from(DEFAULT_MIN_STOCK_ALERT))
}

/// A channel price, falling back to the legacy single `sellingPrice`.
///
/// ```text
/// retailPrice present   → Number(retailPrice) (0 if not numeric)
/// retailPrice absent    → Number(sellingPrice) or 0
/// ```
pub fn coerce_channel_price(obj: &Map<String, Value>, key: &str) -> Money {
    if obj.contains_key(key) {
        money_or_zero(obj, key)
    } else {
        money_or_zero(obj, "sellingPrice")
    }
}

/// Exactly `"WHOLESALE"` is wholesale; everything else is retail.
pub fn coerce_sale_type(value: Option<&Value>) -> SaleChannel {
    value
        .and_then(Value::as_str)
        .map(SaleChannel::from_persisted)
        .unwrap_or_default()
}

/// `"PURCHASE"` is a purchase; everything else counts as a sale.
pub fn coerce_transaction_type(value: Option<&Value>) -> TransactionType {
    match value.and_then(Value::as_str) {
        Some("PURCHASE") => TransactionType::Purchase,
        _ => TransactionType::Sale,
    }
}

/// A persisted status, or one derived from the amounts when unknown.
pub fn coerce_status(value: Option<&Value>, total: Money, paid: Money) -> PaymentStatus {
    match value.and_then(Value::as_str) {
        Some("PAID") => PaymentStatus::Paid,
        Some("PARTIAL") => PaymentStatus::Partial,
        Some("CREDIT") => PaymentStatus::Credit,
        _ => PaymentStatus::derive(total, paid),
    }
}

/// A string field; numbers are stringified, anything else → `default`.
pub fn string_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// A non-empty string field, or `default` when missing or blank.
pub fn non_empty_or(obj: &Map<String, Value>, key: &str, default: &str) -> String {
    match obj.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// An id, minted fresh when the record has none.
pub fn coerce_id(obj: &Map<String, Value>) -> String {
    let id = string_or(obj, "id", "");
    if id.is_empty() {
        let fresh = Uuid::new_v4().to_string();
        warn!(id = %fresh, "Record without id, assigned a new one");
        fresh
    } else {
        id
    }
}

/// An ISO-8601 timestamp, a bare `YYYY-MM-DD` date, or epoch millis.
///
/// Anything else becomes the Unix epoch, which falls outside every bounded
/// report range.
pub fn coerce_date(value: Option<&Value>) -> DateTime<Utc> {
    let parsed = match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        Some(Value::Number(n)) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        if value.map_or(false, |v| !v.is_null()) {
            warn!("Unparsable date, using the epoch");
        }
        DateTime::<Utc>::UNIX_EPOCH
    })
}

// =============================================================================
// Records
// =============================================================================

pub fn sanitize_product(obj: &Map<String, Value>) -> Product {
    Product {
        id: coerce_id(obj),
        name: non_empty_or(obj, "name", UNNAMED_ITEM),
        sku: string_or(obj, "sku", ""),
        stock: number_or(obj, "stock", Decimal::ZERO),
        min_stock_alert: coerce_min_stock_alert(obj),
        cost_price: money_or_zero(obj, "costPrice"),
        retail_price: coerce_channel_price(obj, "retailPrice"),
        wholesale_price: coerce_channel_price(obj, "wholesalePrice"),
        category: non_empty_or(obj, "category", RAW_MATERIAL_CATEGORY),
        last_updated: coerce_date(obj.get("lastUpdated")),
    }
}

fn sanitize_line_item(obj: &Map<String, Value>) -> LineItem {
    LineItem {
        product_id: string_or(obj, "productId", ""),
        quantity: number_or(obj, "quantity", Decimal::ZERO),
        price: money_or_zero(obj, "price"),
        name: string_or(obj, "name", ""),
    }
}

pub fn sanitize_transaction(obj: &Map<String, Value>) -> Transaction {
    let total_amount = money_or_zero(obj, "totalAmount");
    let paid_amount = money_or_zero(obj, "paidAmount");

    Transaction {
        id: coerce_id(obj),
        date: coerce_date(obj.get("date")),
        kind: coerce_transaction_type(obj.get("type")),
        party_name: non_empty_or(obj, "partyName", WALK_IN_CUSTOMER),
        items: collection(obj, "items", sanitize_line_item),
        total_amount,
        paid_amount,
        status: coerce_status(obj.get("status"), total_amount, paid_amount),
        recorded_by: string_or(obj, "recordedBy", ""),
        sale_type: coerce_sale_type(obj.get("saleType")),
    }
}

pub fn sanitize_expense(obj: &Map<String, Value>) -> Expense {
    Expense {
        id: coerce_id(obj),
        date: coerce_date(obj.get("date")),
        category: non_empty_or(obj, "category", "Other"),
        amount: money_or_zero(obj, "amount"),
        description: string_or(obj, "description", ""),
    }
}

fn sanitize_ingredient(obj: &Map<String, Value>) -> Ingredient {
    Ingredient {
        item_id: string_or(obj, "itemId", ""),
        quantity: number_or(obj, "quantity", Decimal::ZERO),
    }
}

pub fn sanitize_formulation(obj: &Map<String, Value>) -> Formulation {
    let instructions = match obj.get("instructions") {
        Some(Value::Array(steps)) => steps
            .iter()
            .filter_map(|s| s.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    Formulation {
        id: coerce_id(obj),
        product_id: string_or(obj, "productId", ""),
        ingredients: collection(obj, "ingredients", sanitize_ingredient),
        instructions,
    }
}

/// Merges stored settings over the defaults.
///
/// ```text
/// currency, brandName   → stored string if present
/// brandAddress, Phone   → stored if non-empty, else default
/// brandLogo             → stored string, else ""
/// language              → ENGLISH, else URDU
/// ```
pub fn sanitize_settings(value: Option<&Value>) -> AppSettings {
    let defaults = AppSettings::default();
    let obj = match value.and_then(Value::as_object) {
        Some(obj) => obj,
        None => return defaults,
    };

    AppSettings {
        currency: string_or(obj, "currency", &defaults.currency),
        brand_name: string_or(obj, "brandName", &defaults.brand_name),
        brand_address: non_empty_or(obj, "brandAddress", &defaults.brand_address),
        brand_phone: non_empty_or(obj, "brandPhone", &defaults.brand_phone),
        brand_logo: string_or(obj, "brandLogo", ""),
        language: obj
            .get("language")
            .and_then(Value::as_str)
            .map(Language::from_persisted)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orina_core::UserRole;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(Some(&json!(140))), Some(dec!(140)));
        assert_eq!(coerce_number(Some(&json!(0.15))), Some(dec!(0.15)));
        assert_eq!(coerce_number(Some(&json!("450"))), Some(dec!(450)));
        assert_eq!(coerce_number(Some(&json!(" 12.5 "))), Some(dec!(12.5)));
        assert_eq!(coerce_number(Some(&json!("abc"))), None);
        assert_eq!(coerce_number(Some(&json!(""))), None);
        assert_eq!(coerce_number(Some(&json!(null))), None);
        assert_eq!(coerce_number(Some(&json!(true))), None);
        assert_eq!(coerce_number(None), None);
    }

    #[test]
    fn test_min_stock_alert_default() {
        assert_eq!(coerce_min_stock_alert(&obj(json!({}))), dec!(5));
        assert_eq!(coerce_min_stock_alert(&obj(json!({"minStockAlert": "x"}))), dec!(5));
        assert_eq!(coerce_min_stock_alert(&obj(json!({"minStockAlert": 20}))), dec!(20));
        assert_eq!(coerce_min_stock_alert(&obj(json!({"minStockAlert": 0}))), dec!(0));
    }

    #[test]
    fn test_legacy_selling_price() {
        let p = sanitize_product(&obj(json!({
            "id": "p-1", "name": "Old Juice", "category": "Finished Good",
            "stock": "12", "sellingPrice": 200
        })));
        assert_eq!(p.retail_price, Money::from_major(200));
        assert_eq!(p.wholesale_price, Money::from_major(200));
        assert_eq!(p.stock, dec!(12));
        assert!(p.cost_price.is_zero());
    }

    #[test]
    fn test_explicit_channel_price_wins_over_legacy() {
        let o = obj(json!({"retailPrice": 350, "sellingPrice": 200}));
        assert_eq!(coerce_channel_price(&o, "retailPrice"), Money::from_major(350));
        assert_eq!(coerce_channel_price(&o, "wholesalePrice"), Money::from_major(200));

        let o = obj(json!({"retailPrice": null, "sellingPrice": 200}));
        assert!(coerce_channel_price(&o, "retailPrice").is_zero());
    }

    #[test]
    fn test_sale_type_exact_literal() {
        assert_eq!(coerce_sale_type(Some(&json!("WHOLESALE"))), SaleChannel::Wholesale);
        assert_eq!(coerce_sale_type(Some(&json!("wholesale"))), SaleChannel::Retail);
        assert_eq!(coerce_sale_type(Some(&json!(1))), SaleChannel::Retail);
        assert_eq!(coerce_sale_type(None), SaleChannel::Retail);
    }

    #[test]
    fn test_transaction_type_and_status() {
        assert_eq!(coerce_transaction_type(Some(&json!("PURCHASE"))), TransactionType::Purchase);
        assert_eq!(coerce_transaction_type(Some(&json!("EXPENSE"))), TransactionType::Sale);

        let total = Money::from_major(1000);
        assert_eq!(coerce_status(Some(&json!("CREDIT")), total, total), PaymentStatus::Credit);
        assert_eq!(
            coerce_status(Some(&json!("???")), total, Money::from_major(400)),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn test_coerce_date() {
        let dt = coerce_date(Some(&json!("2024-03-15T10:00:00.000Z")));
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap());

        let dt = coerce_date(Some(&json!("2024-03-15")));
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());

        assert_eq!(coerce_date(Some(&json!("yesterday"))), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(coerce_date(None), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_transaction_amounts_coerced() {
        let t = sanitize_transaction(&obj(json!({
            "id": "INV-1", "date": "2024-03-15T10:00:00Z", "type": "SALE",
            "items": [{"productId": "fg-1", "quantity": "2", "price": 350, "name": "Juice"}, 7],
            "totalAmount": "700", "paidAmount": "abc", "status": "PAID",
            "saleType": "Wholesale"
        })));
        assert_eq!(t.total_amount, Money::from_major(700));
        assert!(t.paid_amount.is_zero());
        assert_eq!(t.items.len(), 1);
        assert_eq!(t.items[0].quantity, dec!(2));
        assert_eq!(t.sale_type, SaleChannel::Retail);
        assert_eq!(t.party_name, WALK_IN_CUSTOMER);
    }

    #[test]
    fn test_settings_merge() {
        let s = sanitize_settings(Some(&json!({
            "currency": "USD", "brandName": "Acme",
            "brandAddress": "", "language": "ENGLISH"
        })));
        assert_eq!(s.currency, "USD");
        assert_eq!(s.brand_name, "Acme");
        assert_eq!(s.brand_address, AppSettings::default().brand_address);
        assert_eq!(s.brand_phone, AppSettings::default().brand_phone);
        assert_eq!(s.brand_logo, "");
        assert_eq!(s.language, Language::English);

        assert_eq!(sanitize_settings(None), AppSettings::default());
        assert_eq!(sanitize_settings(Some(&json!({"language": "KLINGON"}))).language, Language::Urdu);
    }

    #[test]
    fn test_sanitize_document() {
        let doc = json!({
            "currentUser": {"id": "x", "name": "Intruder", "role": "STAFF", "username": "x"},
            "products": [{"id": "rm-1", "name": "Sugar", "costPrice": 140}],
            "transactions": "not a list",
            "formulations": [{"id": "f", "productId": "fg-1",
                              "ingredients": [{"itemId": "rm-1", "quantity": 0.15}]}]
        });

        let state = sanitize(&doc);
        assert_eq!(state.current_user.role, UserRole::Admin);
        assert_eq!(state.current_user.name, "Administrator");
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products[0].min_stock_alert, dec!(5));
        assert!(state.transactions.is_empty());
        assert!(state.expenses.is_empty());
        assert!(state.formulations[0].instructions.is_empty());
        assert_eq!(state.settings, AppSettings::default());
    }

    #[test]
    fn test_huge_stored_prices_cost_without_overflow() {
        let doc = json!({
            "products": [
                {"id": "rm-1", "name": "Sugar", "costPrice": 7e28, "stock": "7e28"},
                {"id": "fg-1", "name": "Juice", "category": "Finished Good", "retailPrice": 350}
            ],
            "formulations": [{"id": "f", "productId": "fg-1",
                              "ingredients": [{"itemId": "rm-1", "quantity": 2}]}]
        });

        let state = sanitize(&doc);
        let huge = Decimal::from_scientific("7e28").unwrap();
        assert_eq!(state.products[0].cost_price, Money::new(huge));
        assert_eq!(state.products[0].stock, huge);

        assert_eq!(
            orina_core::costing::cost_of_finished_good(&state, "fg-1"),
            Money::new(Decimal::MAX)
        );
        assert_eq!(
            orina_core::costing::margin(&state, "fg-1", SaleChannel::Retail),
            Money::from_major(350) - Money::new(Decimal::MAX)
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let doc = json!({
            "products": [{"id": "fg-1", "name": "Juice", "category": "Finished Good",
                          "sellingPrice": 200, "stock": "3"}],
            "expenses": [{"id": "e", "date": "2024-01-02", "amount": "50"}]
        });

        let once = sanitize(&doc);
        let twice = sanitize(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_non_object_root() {
        let state = sanitize(&json!(5));
        assert!(state.products.is_empty());
        assert_eq!(state.settings, AppSettings::default());
    }
}

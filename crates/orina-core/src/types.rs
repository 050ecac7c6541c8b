//! # Domain Types
//!
//! Core domain types used throughout Orina Operations.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   Formulation   │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  productId      │   │  id (INV-…)     │       │
//! │  │  sku (FG-/RM-)  │◄──│  ingredients[]  │   │  items[] (snap) │       │
//! │  │  stock          │   │  instructions[] │   │  totalAmount    │       │
//! │  │  costPrice      │   └─────────────────┘   │  status         │       │
//! │  │  retail/whole…  │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Expense      │   │  AppSettings    │   │      User       │       │
//! │  │  id (EXP-…)     │   │  currency       │   │  forced default │       │
//! │  │  category       │   │  brand fields   │   │  identity       │       │
//! │  │  amount         │   │  language       │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Category Governs Pricing
//! A product whose category is the literal `"Finished Good"` is priced by its
//! retail/wholesale fields and costed through its formulation. Every other
//! category is a raw material (or packaging) whose `costPrice` is authoritative.
//!
//! ## Persisted Shape
//! Every type here serializes with camelCase keys into the single JSON
//! document owned by `orina-store`. ts-rs exports matching TypeScript types
//! for the web front end.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{FINISHED_GOOD_CATEGORY, RAW_MATERIAL_CATEGORY};

// =============================================================================
// Product
// =============================================================================

/// A stock-keeping unit: either a finished good or a raw material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Stock Keeping Unit, `FG-1234` / `RM-1234` when generated.
    pub sku: String,

    /// Current stock level. Sales may drive it below zero.
    #[ts(type = "number")]
    pub stock: Decimal,

    /// Reorder threshold: an alert is raised when `stock <= minStockAlert`.
    #[ts(type = "number")]
    pub min_stock_alert: Decimal,

    /// Purchase cost. Authoritative for raw materials only.
    #[ts(type = "number")]
    pub cost_price: Money,

    /// Retail unit price. Authoritative for finished goods only.
    #[ts(type = "number")]
    pub retail_price: Money,

    /// Wholesale unit price. Authoritative for finished goods only.
    #[ts(type = "number")]
    pub wholesale_price: Money,

    /// `"Finished Good"` or any other value meaning raw material.
    pub category: String,

    /// When the record was last written.
    #[ts(as = "String")]
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Returns which side of the category split this product is on.
    #[inline]
    pub fn kind(&self) -> ProductKind {
        ProductKind::from_category(&self.category)
    }

    /// Checks if the product is a finished good.
    #[inline]
    pub fn is_finished_good(&self) -> bool {
        self.kind() == ProductKind::FinishedGood
    }

    /// Returns the unit price for a sale channel.
    pub fn price_for(&self, channel: SaleChannel) -> Money {
        match channel {
            SaleChannel::Retail => self.retail_price,
            SaleChannel::Wholesale => self.wholesale_price,
        }
    }

    /// Checks the reorder-alert condition.
    #[inline]
    pub fn needs_reorder(&self) -> bool {
        self.stock <= self.min_stock_alert
    }
}

/// The two product families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ProductKind {
    /// Sellable, costed through a formulation.
    FinishedGood,
    /// Purchased input or packaging, costed directly.
    RawMaterial,
}

impl ProductKind {
    /// Classifies a category string. Only the exact finished-good literal
    /// counts; anything else is a raw material.
    pub fn from_category(category: &str) -> Self {
        if category == FINISHED_GOOD_CATEGORY {
            ProductKind::FinishedGood
        } else {
            ProductKind::RawMaterial
        }
    }

    /// Canonical category string written for new products.
    pub fn category(&self) -> &'static str {
        match self {
            ProductKind::FinishedGood => FINISHED_GOOD_CATEGORY,
            ProductKind::RawMaterial => RAW_MATERIAL_CATEGORY,
        }
    }

    /// Prefix used for generated SKUs.
    pub fn sku_prefix(&self) -> &'static str {
        match self {
            ProductKind::FinishedGood => "FG",
            ProductKind::RawMaterial => "RM",
        }
    }
}

// =============================================================================
// Formulation
// =============================================================================

/// One line of a bill of materials: how much of a raw material goes into one
/// unit of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Ingredient {
    /// Raw-material product id. May dangle after a delete.
    pub item_id: String,

    /// Quantity per unit of output.
    #[ts(type = "number")]
    pub quantity: Decimal,
}

/// The recipe for exactly one finished good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Formulation {
    pub id: String,

    /// Owning finished good. At most one formulation per product.
    pub product_id: String,

    /// Ordered ingredient lines, no duplicate `item_id`.
    pub ingredients: Vec<Ingredient>,

    /// Ordered free-text preparation steps.
    #[serde(default)]
    pub instructions: Vec<String>,
}

// =============================================================================
// Transaction Enums
// =============================================================================

/// What kind of financial event a transaction records.
///
/// Only sales are produced by the point of sale. Purchases are kept because
/// imported documents can carry them and the dashboard nets them out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum TransactionType {
    #[default]
    Sale,
    Purchase,
}

/// How much of a transaction was settled at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum PaymentStatus {
    /// Paid in full (or over-paid).
    Paid,
    /// Nothing paid, full amount on credit.
    Credit,
    /// Something paid, balance outstanding.
    Partial,
}

impl PaymentStatus {
    /// Derives the status once, at creation.
    ///
    /// ```text
    /// paid >= total      → PAID
    /// 0 < paid < total   → PARTIAL
    /// otherwise          → CREDIT
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use orina_core::{Money, PaymentStatus};
    ///
    /// let total = Money::from_major(1000);
    /// assert_eq!(PaymentStatus::derive(total, Money::from_major(400)), PaymentStatus::Partial);
    /// ```
    pub fn derive(total: Money, paid: Money) -> Self {
        if paid >= total {
            PaymentStatus::Paid
        } else if paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Credit
        }
    }
}

/// Which price field a sale line uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum SaleChannel {
    #[default]
    Retail,
    Wholesale,
}

impl SaleChannel {
    /// Reads a persisted channel. Anything but the exact `WHOLESALE` literal
    /// is a retail sale.
    pub fn from_persisted(value: &str) -> Self {
        if value == "WHOLESALE" {
            SaleChannel::Wholesale
        } else {
            SaleChannel::Retail
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A sale line, frozen at the moment of sale.
///
/// The name and price are snapshots so historical invoices stay correct after
/// the product is renamed, re-priced or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,

    #[ts(type = "number")]
    pub quantity: Decimal,

    /// Unit price charged (frozen).
    #[ts(type = "number")]
    pub price: Money,

    /// Product name at time of sale (frozen).
    pub name: String,
}

impl LineItem {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }
}

/// An immutable financial event.
///
/// Monetary fields are computed once at creation and never recomputed. The
/// only permitted change is deleting the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Transaction {
    /// Human-legible id, `INV-123456`.
    pub id: String,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Counterparty, the walk-in sentinel when left blank.
    pub party_name: String,

    pub items: Vec<LineItem>,

    /// Σ quantity × price, frozen at creation.
    #[ts(type = "number")]
    pub total_amount: Money,

    #[ts(type = "number")]
    pub paid_amount: Money,

    pub status: PaymentStatus,

    /// Name of whoever recorded it.
    pub recorded_by: String,

    pub sale_type: SaleChannel,
}

impl Transaction {
    /// Checks if this transaction counts as revenue.
    #[inline]
    pub fn is_sale(&self) -> bool {
        self.kind == TransactionType::Sale
    }

    /// Amount still owed by the counterparty (never negative).
    pub fn balance_due(&self) -> Money {
        let due = self.total_amount - self.paid_amount;
        if due.is_negative() {
            Money::zero()
        } else {
            due
        }
    }
}

// =============================================================================
// Expense
// =============================================================================

/// A standalone operating cost. Never linked to products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Expense {
    /// `EXP-<epoch millis>`.
    pub id: String,

    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Free string; see [`EXPENSE_CATEGORIES`] for the suggested set.
    pub category: String,

    #[ts(type = "number")]
    pub amount: Money,

    pub description: String,
}

/// Categories offered when recording an expense. Not enforced.
pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Utilities",
    "Rent",
    "Salaries",
    "Maintenance",
    "Marketing",
    "Other",
];

// =============================================================================
// Settings
// =============================================================================

/// Interface language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Language {
    #[default]
    Urdu,
    English,
}

/// Text direction implied by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Rtl,
    Ltr,
}

impl Language {
    /// Reads a persisted selector; unknown values fall back to Urdu.
    pub fn from_persisted(value: &str) -> Self {
        match value {
            "ENGLISH" => Language::English,
            _ => Language::Urdu,
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Language::Urdu => TextDirection::Rtl,
            Language::English => TextDirection::Ltr,
        }
    }

    /// BCP-47 tag for the document root.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Urdu => "ur",
            Language::English => "en",
        }
    }
}

/// Store configuration, replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AppSettings {
    /// ISO 4217 code used when formatting amounts.
    pub currency: String,
    pub brand_name: String,
    pub brand_address: String,
    pub brand_phone: String,
    /// Logo as a data URL; empty when unset.
    pub brand_logo: String,
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            currency: "PKR".to_string(),
            brand_name: "Orina Foods".to_string(),
            brand_address: "Plot 45, Industrial Estate, Faisalabad".to_string(),
            brand_phone: "0300-1234567".to_string(),
            brand_logo: String::new(),
            language: Language::Urdu,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// Role attached to the operator identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum UserRole {
    Admin,
    Manager,
    Staff,
}

/// The operator identity stored in the document.
///
/// There is no authentication: whatever was persisted is replaced by
/// [`User::default_identity`] on every load and import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub username: String,
}

impl User {
    /// The single fixed identity.
    pub fn default_identity() -> Self {
        User {
            id: "admin-1".to_string(),
            name: "Administrator".to_string(),
            role: UserRole::Admin,
            username: "admin".to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

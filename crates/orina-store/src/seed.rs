//! # Seed Data
//!
//! The document a fresh install starts from: a mango-juice line with its raw
//! materials, a cleaning-products chemical catalog, two invoices, one expense
//! and one recipe.
//!
//! Dates are relative to `now` so the seeded sales land in "today" and
//! "this week" reports.

use chrono::{DateTime, Duration, Utc};
use orina_core::{
    AppSettings, AppState, Expense, Formulation, Ingredient, LineItem, Money, PaymentStatus,
    Product, SaleChannel, Transaction, TransactionType, User, FINISHED_GOOD_CATEGORY,
    RAW_MATERIAL_CATEGORY,
};
use rust_decimal::Decimal;

/// (id, name, sku, stock, minStockAlert, costPrice)
const RAW_MATERIALS: &[(&str, &str, &str, i64, i64, i64)] = &[
    ("rm-1", "Refined Sugar (Cheeni)", "RM-1001", 500, 50, 140),
    ("rm-2", "Mango Pulp (Aam Gudda)", "RM-1002", 200, 20, 450),
    ("rm-3", "PET Bottle 1L (Empty)", "RM-1003", 1000, 100, 35),
    ("rm-4", "Premium Label Sticker", "RM-1004", 2000, 200, 8),
    ("rm-5", "Preservative Chemical", "RM-1005", 50, 5, 1200),
    ("rm-6", "Water (RO / Deionized)", "RM-1006", 1000, 100, 5),
    ("rm-7", "Sodium Laureth Sulfate (SLES)", "RM-1007", 200, 20, 650),
    ("rm-8", "Linear Alkyl Benzene Sulphonic Acid (LABSA)", "RM-1008", 150, 15, 580),
    ("rm-9", "Cocamidopropyl Betaine (CAPB)", "RM-1009", 100, 10, 450),
    ("rm-10", "Cocamide DEA / MEA", "RM-1010", 50, 5, 900),
    ("rm-11", "Sodium Hydroxide (Caustic Soda)", "RM-1011", 500, 50, 300),
    ("rm-12", "Citric Acid", "RM-1012", 100, 10, 400),
    ("rm-13", "Sodium Chloride (Common Salt)", "RM-1013", 1000, 100, 30),
    ("rm-14", "Soda Ash (Sodium Carbonate)", "RM-1014", 500, 50, 120),
    ("rm-15", "Sodium Silicate", "RM-1015", 200, 20, 80),
    ("rm-16", "Stearic Acid", "RM-1016", 50, 5, 700),
    ("rm-17", "Coconut Oil", "RM-1017", 100, 10, 1200),
    ("rm-18", "Palm Oil / Palm Kernel Oil", "RM-1018", 100, 10, 900),
    ("rm-19", "Glycerin", "RM-1019", 50, 5, 600),
    ("rm-20", "Propylene Glycol", "RM-1020", 50, 5, 850),
    ("rm-21", "Sorbitol / Sugar", "RM-1021", 200, 20, 150),
    ("rm-22", "Ethanol (Alcohol)", "RM-1022", 100, 10, 1500),
    ("rm-23", "Pearlizing Agent", "RM-1023", 20, 2, 1100),
    ("rm-24", "Conditioning Polymer (Polyquaternium-7/10)", "RM-1024", 10, 1, 1800),
    ("rm-25", "Thickener (Carbomer / HEC)", "RM-1025", 10, 1, 3000),
    ("rm-26", "Aloe Vera Extract / Gel", "RM-1026", 20, 2, 2000),
    ("rm-27", "Herbal Extracts (Amla, Reetha, etc)", "RM-1027", 50, 5, 1500),
    ("rm-28", "Essential Oils", "RM-1028", 10, 1, 5000),
    ("rm-29", "Vitamin E", "RM-1029", 5, 1, 6000),
    ("rm-30", "Titanium Dioxide", "RM-1030", 20, 2, 2500),
    ("rm-31", "Optical Brightener", "RM-1031", 10, 1, 4000),
    ("rm-32", "Preservative (Formalin/Other)", "RM-1032", 20, 2, 1200),
    ("rm-33", "Fragrance / Perfume", "RM-1033", 30, 5, 4500),
    ("rm-34", "Color (Dye)", "RM-1034", 20, 2, 3500),
];

/// (id, name, sku, stock, minStockAlert, retailPrice, wholesalePrice)
const FINISHED_GOODS: &[(&str, &str, &str, i64, i64, i64, i64)] = &[
    ("fg-1", "Premium Mango Juice 1L", "FG-2001", 45, 10, 350, 280),
    ("fg-2", "Mango Nectar 500ml", "FG-2002", 100, 20, 180, 140),
];

const JUICE_STEPS: &[&str] = &[
    "Heat 500 ml of water to 80 degrees.",
    "Add the sugar and preservative and mix well.",
    "Add the mango pulp (gudda) and cook the mixture for 5 minutes.",
    "Strain the mixture to separate the stones.",
    "Let the juice cool to room temperature.",
    "Fill the bottles, apply labels and pack into cartons.",
];

/// Builds the default document.
pub fn seed_state(now: DateTime<Utc>) -> AppState {
    let yesterday = now - Duration::days(1);

    let mut products: Vec<Product> = RAW_MATERIALS
        .iter()
        .map(|&(id, name, sku, stock, alert, cost)| Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: sku.to_string(),
            stock: Decimal::from(stock),
            min_stock_alert: Decimal::from(alert),
            cost_price: Money::from_major(cost),
            retail_price: Money::zero(),
            wholesale_price: Money::zero(),
            category: RAW_MATERIAL_CATEGORY.to_string(),
            last_updated: now,
        })
        .collect();

    products.extend(FINISHED_GOODS.iter().map(
        |&(id, name, sku, stock, alert, retail, wholesale)| Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: sku.to_string(),
            stock: Decimal::from(stock),
            min_stock_alert: Decimal::from(alert),
            cost_price: Money::zero(),
            retail_price: Money::from_major(retail),
            wholesale_price: Money::from_major(wholesale),
            category: FINISHED_GOOD_CATEGORY.to_string(),
            last_updated: now,
        },
    ));

    let line = |product_id: &str, name: &str, quantity: i64, price: i64| LineItem {
        product_id: product_id.to_string(),
        quantity: Decimal::from(quantity),
        price: Money::from_major(price),
        name: name.to_string(),
    };

    let transactions = vec![
        Transaction {
            id: "INV-1001".to_string(),
            date: yesterday,
            kind: TransactionType::Sale,
            party_name: "Super Mart Lahore".to_string(),
            items: vec![
                line("fg-1", "Premium Mango Juice 1L", 10, 280),
                line("fg-2", "Mango Nectar 500ml", 24, 140),
            ],
            total_amount: Money::from_major(6160),
            paid_amount: Money::from_major(6160),
            status: PaymentStatus::Paid,
            recorded_by: "ADMIN".to_string(),
            sale_type: SaleChannel::Wholesale,
        },
        Transaction {
            id: "INV-1002".to_string(),
            date: now,
            kind: TransactionType::Sale,
            party_name: "Walk-in Customer".to_string(),
            items: vec![line("fg-1", "Premium Mango Juice 1L", 2, 350)],
            total_amount: Money::from_major(700),
            paid_amount: Money::from_major(700),
            status: PaymentStatus::Paid,
            recorded_by: "ADMIN".to_string(),
            sale_type: SaleChannel::Retail,
        },
    ];

    let expenses = vec![Expense {
        id: "exp-1".to_string(),
        date: yesterday,
        category: "Utilities".to_string(),
        amount: Money::from_major(5000),
        description: "Electricity Bill".to_string(),
    }];

    let formulations = vec![Formulation {
        id: "form-1".to_string(),
        product_id: "fg-1".to_string(),
        ingredients: [
            ("rm-1", Decimal::new(15, 2)),
            ("rm-2", Decimal::new(2, 1)),
            ("rm-3", Decimal::ONE),
            ("rm-4", Decimal::ONE),
            ("rm-5", Decimal::new(5, 3)),
        ]
        .iter()
        .map(|&(item_id, quantity)| Ingredient {
            item_id: item_id.to_string(),
            quantity,
        })
        .collect(),
        instructions: JUICE_STEPS.iter().map(|s| s.to_string()).collect(),
    }];

    AppState {
        current_user: User::default_identity(),
        products,
        transactions,
        expenses,
        formulations,
        settings: AppSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orina_core::costing::cost_of_finished_good;
    use orina_core::ledger::{report_in, ReportRange};
    use rust_decimal_macros::dec;

    #[test]
    fn test_seed_catalog() {
        let state = seed_state(Utc::now());
        assert_eq!(state.raw_materials().count(), 34);
        assert_eq!(state.finished_goods().count(), 2);
        assert_eq!(state.transactions[0].id, "INV-1001");
        assert_eq!(state.formulations[0].instructions.len(), 6);
    }

    #[test]
    fn test_seed_invoice_totals_match_lines() {
        let state = seed_state(Utc::now());
        for tx in &state.transactions {
            let lines: Money = tx.items.iter().map(LineItem::line_total).sum();
            assert_eq!(lines, tx.total_amount, "{}", tx.id);
        }
    }

    #[test]
    fn test_seed_juice_cost() {
        let state = seed_state(Utc::now());
        // 21 + 90 + 35 + 8 + 6
        assert_eq!(cost_of_finished_good(&state, "fg-1"), Money::new(dec!(160)));
        assert!(cost_of_finished_good(&state, "fg-2").is_zero());
    }

    #[test]
    fn test_seed_today_report() {
        let now = Utc::now();
        let state = seed_state(now);
        let today = report_in(&state, ReportRange::Today, &now).summary;
        assert_eq!(today.total_sales, Money::from_major(700));
        assert_eq!(today.total_cost, Money::from_major(320));
    }
}

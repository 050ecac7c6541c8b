//! # Report Commands
//!
//! Range-bound profit and loss, and the all-time dashboard.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::state::AppController;
use orina_core::ledger;
use orina_core::{DashboardSummary, Report, ReportRange};

/// Sales, cost of goods and expenses inside `range`, on local calendar days.
pub fn report(controller: &AppController, range: ReportRange, now: DateTime<Utc>) -> Report {
    let report = ledger::report(controller.state(), range, now);
    debug!(
        range = ?range,
        transactions = report.transactions.len(),
        net = %report.summary.net_profit,
        "Report built"
    );
    report
}

pub fn dashboard(controller: &AppController) -> DashboardSummary {
    ledger::dashboard(controller.state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::{record_sale, SaleRequest};
    use crate::commands::seeded_controller;
    use orina_core::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_all_time_includes_new_sale() {
        let (_dir, mut controller, now) = seeded_controller();
        let before = report(&controller, ReportRange::AllTime, now).summary;

        record_sale(
            &mut controller,
            SaleRequest {
                items: vec![("fg-1".to_string(), dec!(1))],
                ..Default::default()
            },
            now,
        )
        .unwrap();

        let after = report(&controller, ReportRange::AllTime, now).summary;
        assert_eq!(after.total_sales - before.total_sales, Money::from_major(350));
        assert_eq!(after.total_cost - before.total_cost, Money::from_major(160));
        assert_eq!(after.net_profit - before.net_profit, Money::from_major(190));
    }

    #[test]
    fn test_dashboard_totals() {
        let (_dir, controller, _) = seeded_controller();
        let summary = dashboard(&controller);

        assert_eq!(summary.total_expenses, Money::from_major(5000));
        assert_eq!(summary.total_purchases, Money::zero());
        assert_eq!(summary.net, summary.total_sales - summary.total_expenses);
        assert!(summary.low_stock.len() <= orina_core::ledger::DASHBOARD_ALERTS);
    }
}

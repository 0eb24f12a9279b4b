//! Report assembly: run every aggregate once over the shared table.

use super::billing::{billing_curve_zoom, billing_disable_curve, BillingBin};
use super::cohort::{group_summary, top_n, with_min_total, GroupColumn, GroupSummaryRow};
use super::status::{
    duration_among_early_disabled, duration_counts, early_vs_active_counts, renew_status_counts,
};
use super::timing::{
    cancel_day_histogram, cancel_month_histogram, disables_by_calendar_month,
    first_week_histogram, last_week_histogram, MonthBin,
};
use super::{CountTable, HistogramBin};
use crate::types::SubscriptionTable;
use serde::Serialize;

/// Tuning knobs for report generation.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Number of product sub-groups to keep in the group summary
    pub top_product_groups: usize,
    /// Minimum cohort total for a payment gateway to appear
    pub min_gateway_total: u64,
    /// Upper bound (EUR) of the zoomed billing curve
    pub zoom_max_eur: i64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_product_groups: 5,
            min_gateway_total: 100,
            zoom_max_eur: 8,
        }
    }
}

/// Every aggregate the report surfaces, computed in one pass over the table.
#[derive(Debug, Clone, Serialize)]
pub struct ReportStats {
    /// Total records in the source table
    pub record_count: usize,
    /// Auto-Renew ON vs OFF
    pub renew_status: CountTable,
    /// 12-Month vs 1-Month among ON
    pub duration_on: CountTable,
    /// Disabled Early vs Active Until End among classifiable ON records
    pub early_vs_active: CountTable,
    /// 12-Month vs 1-Month among the Disabled Early subset
    pub duration_early: CountTable,
    /// Month-of-subscription histogram (12-month cohort)
    pub cancel_month: Vec<HistogramBin>,
    /// Day-of-subscription histogram (1-month cohort)
    pub cancel_day: Vec<HistogramBin>,
    /// First 7 days after start, zero-filled
    pub first_week: Vec<HistogramBin>,
    /// Last 7 days before end, zero-filled
    pub last_week: Vec<HistogramBin>,
    /// Disables by calendar month of the disable boundary
    pub calendar_months: Vec<MonthBin>,
    /// Top product sub-groups in the ON + 12-month cohort
    pub product_groups: Vec<GroupSummaryRow>,
    /// Payment gateways meeting the minimum cohort total
    pub payment_gateways: Vec<GroupSummaryRow>,
    /// Disables by billed amount, full range
    pub billing_curve: Vec<BillingBin>,
    /// Disables by billed amount, zoomed window
    pub billing_curve_zoom: Vec<BillingBin>,
}

/// Generate the full report.
///
/// Pure and infallible: empty cohorts produce empty or zero-filled tables
/// per each aggregate's rules, never an error.
pub fn generate_report(table: &SubscriptionTable, config: &ReportConfig) -> ReportStats {
    let billing_curve = billing_disable_curve(table);
    let billing_zoomed = billing_curve_zoom(&billing_curve, config.zoom_max_eur);

    ReportStats {
        record_count: table.len(),
        renew_status: renew_status_counts(table),
        duration_on: duration_counts(table),
        early_vs_active: early_vs_active_counts(table),
        duration_early: duration_among_early_disabled(table),
        cancel_month: cancel_month_histogram(table),
        cancel_day: cancel_day_histogram(table),
        first_week: first_week_histogram(table),
        last_week: last_week_histogram(table),
        calendar_months: disables_by_calendar_month(table),
        product_groups: top_n(
            group_summary(table, GroupColumn::ProductSubGroup),
            config.top_product_groups,
        ),
        payment_gateways: with_min_total(
            group_summary(table, GroupColumn::PaymentGateway),
            config.min_gateway_total,
        ),
        billing_curve,
        billing_curve_zoom: billing_zoomed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubscriptionRecord;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_report_on_empty_table() {
        let stats = generate_report(&SubscriptionTable::new(vec![]), &ReportConfig::default());
        assert_eq!(stats.record_count, 0);
        assert!(stats.renew_status.is_empty());
        assert!(stats.cancel_month.is_empty());
        // Zero-fill law holds even with no data
        assert_eq!(stats.first_week.len(), 7);
        assert_eq!(stats.last_week.len(), 7);
        assert!(stats.product_groups.is_empty());
        assert!(stats.billing_curve.is_empty());
    }

    #[test]
    fn test_report_wires_config_filters() {
        let ts = |d: u32| Utc.with_ymd_and_hms(2024, 6, d, 0, 0, 0).unwrap();
        let record = |group: &str| SubscriptionRecord {
            is_auto_renew: true,
            started_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ar_valid_to: Some(ts(1)),
            ended_at: Some(ts(30)),
            period_months: Some(12),
            product_sub_group: Some(group.to_string()),
            ..Default::default()
        };
        let table = SubscriptionTable::new(vec![
            record("a"),
            record("a"),
            record("b"),
            record("c"),
        ]);

        let config = ReportConfig {
            top_product_groups: 2,
            min_gateway_total: 100,
            ..Default::default()
        };
        let stats = generate_report(&table, &config);

        assert_eq!(stats.product_groups.len(), 2);
        assert_eq!(stats.product_groups[0].value, "a");
        // All four share the default "unknown" gateway but 4 < 100
        assert!(stats.payment_gateways.is_empty());
    }
}

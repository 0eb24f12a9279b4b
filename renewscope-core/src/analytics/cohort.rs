//! Cohort aggregates: which groups disable auto-renew early?
//!
//! The base cohort is auto-renew ON with a 12-month period; the early subset
//! is its Disabled Early restriction. For each distinct group value the
//! summary reports counts on both sides plus each side's percentage share.

use crate::types::{DisableClass, SubscriptionRecord, SubscriptionTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which column to group the cohort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupColumn {
    ProductSubGroup,
    PaymentGateway,
}

impl GroupColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupColumn::ProductSubGroup => "product_sub_group",
            GroupColumn::PaymentGateway => "payment_gateway",
        }
    }

    /// Group value for a record; `None` excludes the record from grouping.
    fn value<'a>(&self, record: &'a SubscriptionRecord) -> Option<&'a str> {
        match self {
            GroupColumn::ProductSubGroup => record.product_sub_group.as_deref(),
            GroupColumn::PaymentGateway => Some(record.payment_gateway.as_str()),
        }
    }
}

/// One group's slice of the cohort and of its early-disable subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummaryRow {
    /// Distinct value of the group column
    pub value: String,
    /// Records in the ON + 12-month cohort with this value
    pub total_count: u64,
    /// Records in the Disabled Early subset with this value
    pub early_count: u64,
    /// Share of the cohort total, percent, rounded to 2dp
    pub pct_of_total: f64,
    /// Share of the early-subset total, percent, rounded to 2dp
    pub pct_of_early: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percentage of `part` in `whole`, 0 over an empty denominator.
fn pct(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 / whole as f64 * 100.0)
    }
}

/// Summarize the ON + 12-month cohort by a group column.
///
/// Categories present on only one side still appear, with 0 for the missing
/// side (outer union, not inner join). Rows are ordered by total count
/// descending, then early count descending, then value.
pub fn group_summary(table: &SubscriptionTable, column: GroupColumn) -> Vec<GroupSummaryRow> {
    let mut totals: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    let mut cohort_total = 0u64;
    let mut early_total = 0u64;

    for record in table.records() {
        if !record.is_auto_renew || record.period_months != Some(12) {
            continue;
        }
        let Some(value) = column.value(record) else {
            continue;
        };
        let entry = totals.entry(value.to_string()).or_insert((0, 0));
        entry.0 += 1;
        cohort_total += 1;
        if record.disable_class() == Some(DisableClass::DisabledEarly) {
            entry.1 += 1;
            early_total += 1;
        }
    }

    let mut rows: Vec<GroupSummaryRow> = totals
        .into_iter()
        .map(|(value, (total_count, early_count))| GroupSummaryRow {
            value,
            total_count,
            early_count,
            pct_of_total: pct(total_count, cohort_total),
            pct_of_early: pct(early_count, early_total),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_count
            .cmp(&a.total_count)
            .then(b.early_count.cmp(&a.early_count))
            .then(a.value.cmp(&b.value))
    });
    rows
}

/// Keep the first `n` rows (by the summary's total-count ordering).
pub fn top_n(rows: Vec<GroupSummaryRow>, n: usize) -> Vec<GroupSummaryRow> {
    rows.into_iter().take(n).collect()
}

/// Keep only rows whose cohort total meets a minimum count.
pub fn with_min_total(rows: Vec<GroupSummaryRow>, min_total: u64) -> Vec<GroupSummaryRow> {
    rows.into_iter()
        .filter(|row| row.total_count >= min_total)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn cohort_record(group: &str, gateway: &str, early: bool) -> SubscriptionRecord {
        let (valid_to, ended) = if early {
            (ts(2024, 6, 1), ts(2025, 1, 1))
        } else {
            (ts(2025, 1, 1), ts(2025, 1, 1))
        };
        SubscriptionRecord {
            is_auto_renew: true,
            started_at: Some(ts(2024, 1, 1)),
            ar_valid_to: Some(valid_to),
            ended_at: Some(ended),
            period_months: Some(12),
            payment_gateway: gateway.to_string(),
            product_sub_group: Some(group.to_string()),
            ..Default::default()
        }
    }

    fn sample_table() -> SubscriptionTable {
        SubscriptionTable::new(vec![
            cohort_record("domain", "checkout", true),
            cohort_record("domain", "checkout", false),
            cohort_record("domain", "paypal", true),
            cohort_record("hosting", "checkout", false),
            // Outside the cohort: 1-month period
            SubscriptionRecord {
                is_auto_renew: true,
                period_months: Some(1),
                product_sub_group: Some("email".to_string()),
                ..Default::default()
            },
            // Outside the cohort: auto-renew OFF
            SubscriptionRecord {
                period_months: Some(12),
                product_sub_group: Some("email".to_string()),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_group_summary_counts_and_percentages() {
        let rows = group_summary(&sample_table(), GroupColumn::ProductSubGroup);
        assert_eq!(rows.len(), 2);

        let domain = &rows[0];
        assert_eq!(domain.value, "domain");
        assert_eq!(domain.total_count, 3);
        assert_eq!(domain.early_count, 2);
        assert_eq!(domain.pct_of_total, 75.0);
        assert_eq!(domain.pct_of_early, 100.0);

        let hosting = &rows[1];
        assert_eq!(hosting.value, "hosting");
        assert_eq!(hosting.total_count, 1);
        assert_eq!(hosting.early_count, 0);
        assert_eq!(hosting.pct_of_total, 25.0);
        assert_eq!(hosting.pct_of_early, 0.0);
    }

    #[test]
    fn test_group_summary_percentages_sum_to_hundred() {
        let rows = group_summary(&sample_table(), GroupColumn::PaymentGateway);
        let total_pct: f64 = rows.iter().map(|r| r.pct_of_total).sum();
        let early_pct: f64 = rows.iter().map(|r| r.pct_of_early).sum();
        assert!((total_pct - 100.0).abs() < 0.05, "got {total_pct}");
        assert!((early_pct - 100.0).abs() < 0.05, "got {early_pct}");
    }

    #[test]
    fn test_group_summary_empty_cohort() {
        let table = SubscriptionTable::new(vec![SubscriptionRecord::default()]);
        let rows = group_summary(&table, GroupColumn::PaymentGateway);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_group_summary_zero_early_subset_is_not_an_error() {
        // Cohort with no early disables: pct_of_early must be 0, not NaN
        let table = SubscriptionTable::new(vec![
            cohort_record("domain", "checkout", false),
            cohort_record("hosting", "paypal", false),
        ]);
        let rows = group_summary(&table, GroupColumn::ProductSubGroup);
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.early_count, 0);
            assert_eq!(row.pct_of_early, 0.0);
        }
    }

    #[test]
    fn test_post_filters() {
        let rows = group_summary(&sample_table(), GroupColumn::ProductSubGroup);
        assert_eq!(top_n(rows.clone(), 1).len(), 1);
        assert_eq!(top_n(rows.clone(), 1)[0].value, "domain");

        let filtered = with_min_total(rows, 2);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].value, "domain");
    }

    #[test]
    fn test_group_summary_ordering() {
        let rows = group_summary(&sample_table(), GroupColumn::PaymentGateway);
        assert_eq!(rows[0].value, "checkout");
        assert_eq!(rows[0].total_count, 3);
        assert_eq!(rows[1].value, "paypal");
    }
}

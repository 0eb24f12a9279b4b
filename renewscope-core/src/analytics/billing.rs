//! Billing correlation: how does the billed amount relate to disables?

use crate::types::{days_between, SubscriptionTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One whole-EUR bucket of the billing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBin {
    /// Billed amount rounded to the nearest whole EUR (excl. VAT)
    pub amount_eur: i64,
    pub count: u64,
}

/// Disables grouped by billed amount, ordered ascending by amount.
///
/// Cohort: auto-renew ON, 12-month period, both timestamps and a billing
/// amount present, with the disable at or before the period end
/// (`days_between(ar_valid_to, ended_at) >= 0`).
pub fn billing_disable_curve(table: &SubscriptionTable) -> Vec<BillingBin> {
    let mut counts = BTreeMap::new();
    for record in table.records() {
        if !record.is_auto_renew || record.period_months != Some(12) {
            continue;
        }
        let (Some(valid_to), Some(ended), Some(amount)) =
            (record.ar_valid_to, record.ended_at, record.billings_eur_excl_vat)
        else {
            continue;
        };
        if days_between(valid_to, ended) < 0 {
            continue;
        }
        let bucket = amount.round() as i64;
        *counts.entry(bucket).or_insert(0u64) += 1;
    }
    counts
        .into_iter()
        .map(|(amount_eur, count)| BillingBin { amount_eur, count })
        .collect()
}

/// The billing curve restricted to the 0..=8 EUR range.
pub fn billing_curve_zoom(curve: &[BillingBin], max_eur: i64) -> Vec<BillingBin> {
    curve
        .iter()
        .filter(|bin| (0..=max_eur).contains(&bin.amount_eur))
        .copied()
        .collect()
}

//! Aggregation engine for renewscope
//!
//! Every query here is a pure function from (`&SubscriptionTable`, parameters)
//! to a derived result table. Queries are independent: none mutates the source
//! and none depends on another's output.
//!
//! - [`status`]: ON/OFF, duration, and early-vs-active partitions
//! - [`timing`]: time-to-cancel histograms (day, month, calendar month)
//! - [`cohort`]: group summaries with cohort/early-subset percentages
//! - [`billing`]: disables-by-billing-amount correlation curve
//! - [`report`]: assembles the full report in one pass

pub mod billing;
pub mod cohort;
pub mod report;
pub mod status;
pub mod timing;

pub use billing::{billing_curve_zoom, billing_disable_curve, BillingBin};
pub use cohort::{group_summary, top_n, with_min_total, GroupColumn, GroupSummaryRow};
pub use report::{generate_report, ReportConfig, ReportStats};
pub use status::{
    duration_among_early_disabled, duration_counts, early_vs_active_counts, renew_status_counts,
};
pub use timing::{
    cancel_day_histogram, cancel_month_histogram, disables_by_calendar_month,
    first_week_histogram, last_week_histogram, MonthBin,
};

use serde::{Deserialize, Serialize};

// ============================================
// Result tables
// ============================================

/// One labeled count in a [`CountTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub label: String,
    pub count: u64,
}

/// An ordered label → count result table.
///
/// Row order is insertion order of first occurrence unless the producing
/// query sorts explicitly. A missing label reads as count 0, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountTable {
    rows: Vec<CountRow>,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from pre-computed rows, keeping the given order.
    pub fn from_rows(rows: Vec<CountRow>) -> Self {
        Self { rows }
    }

    /// Increment the count for a label, appending it on first occurrence.
    pub fn tally(&mut self, label: &str) {
        match self.rows.iter_mut().find(|row| row.label == label) {
            Some(row) => row.count += 1,
            None => self.rows.push(CountRow {
                label: label.to_string(),
                count: 1,
            }),
        }
    }

    /// Count for a label; 0 when the label never occurred.
    pub fn get(&self, label: &str) -> u64 {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.count)
            .unwrap_or(0)
    }

    pub fn rows(&self) -> &[CountRow] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().map(|row| row.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One bucket of an integer-keyed histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Day number, month-of-subscription, or rounded amount
    pub bucket: i64,
    pub count: u64,
}

//! Status aggregates: ON/OFF, duration, and early-vs-active partitions.

use super::{CountRow, CountTable};
use crate::types::{DisableClass, SubscriptionTable};

/// Label for records with auto-renew enabled.
pub const LABEL_AUTO_RENEW_ON: &str = "Auto-Renew ON";
/// Label for records with auto-renew disabled (or absent in the source).
pub const LABEL_AUTO_RENEW_OFF: &str = "Auto-Renew OFF";
/// Label for 12-month subscriptions in duration breakdowns.
pub const LABEL_12_MONTH: &str = "12-Month";
/// Label for 1-month subscriptions in duration breakdowns.
pub const LABEL_1_MONTH: &str = "1-Month";

/// Partition all records by auto-renew status.
///
/// ON + OFF always sums to the total record count.
pub fn renew_status_counts(table: &SubscriptionTable) -> CountTable {
    let mut counts = CountTable::new();
    for record in table.records() {
        if record.is_auto_renew {
            counts.tally(LABEL_AUTO_RENEW_ON);
        } else {
            counts.tally(LABEL_AUTO_RENEW_OFF);
        }
    }
    counts
}

/// Partition auto-renew ON records with a 1- or 12-month period by duration.
///
/// Always filters to ON; other period lengths fall outside the breakdown.
/// Reported 12-Month before 1-Month; buckets with no records are omitted.
pub fn duration_counts(table: &SubscriptionTable) -> CountTable {
    duration_breakdown(
        table
            .records()
            .iter()
            .filter(|r| r.is_auto_renew)
            .filter_map(|r| r.period_months),
    )
}

/// Partition classifiable ON records into Disabled Early vs Active Until End.
///
/// Records missing either timestamp are excluded entirely (neither bucket).
pub fn early_vs_active_counts(table: &SubscriptionTable) -> CountTable {
    let mut counts = CountTable::new();
    for record in table.records() {
        if let Some(class) = record.disable_class() {
            counts.tally(class.as_str());
        }
    }
    counts
}

/// Duration breakdown restricted to the Disabled Early subset.
pub fn duration_among_early_disabled(table: &SubscriptionTable) -> CountTable {
    duration_breakdown(
        table
            .records()
            .iter()
            .filter(|r| r.disable_class() == Some(DisableClass::DisabledEarly))
            .filter_map(|r| r.period_months),
    )
}

fn duration_breakdown(periods: impl Iterator<Item = i32>) -> CountTable {
    let mut twelve = 0u64;
    let mut one = 0u64;
    for months in periods {
        match months {
            12 => twelve += 1,
            1 => one += 1,
            _ => {}
        }
    }

    // Fixed 12-before-1 reporting order; empty buckets are omitted
    let mut rows = Vec::new();
    if twelve > 0 {
        rows.push(CountRow {
            label: LABEL_12_MONTH.to_string(),
            count: twelve,
        });
    }
    if one > 0 {
        rows.push(CountRow {
            label: LABEL_1_MONTH.to_string(),
            count: one,
        });
    }
    CountTable::from_rows(rows)
}

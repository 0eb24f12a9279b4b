//! Time-offset aggregates: when do users disable auto-renew?
//!
//! Every query here runs over the early-disable cohort: auto-renew ON,
//! both timestamps present, `ar_valid_to < ended_at`, restricted to one
//! period length. Fixed-domain histograms (first/last week) are zero-filled
//! so sparse data never drops a bucket from the output.

use super::HistogramBin;
use crate::types::{DisableClass, SubscriptionRecord, SubscriptionTable};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// One calendar-month bucket of [`disables_by_calendar_month`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBin {
    /// Calendar month number, 1..=12
    pub month: u32,
    /// English month name
    pub name: &'static str,
    pub count: u64,
}

/// English name for a calendar month number (1..=12).
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

fn early_disabled_with_period(
    table: &SubscriptionTable,
    months: i32,
) -> impl Iterator<Item = &SubscriptionRecord> {
    table
        .records()
        .iter()
        .filter(move |r| r.period_months == Some(months))
        .filter(|r| r.disable_class() == Some(DisableClass::DisabledEarly))
}

fn to_bins(counts: BTreeMap<i64, u64>) -> Vec<HistogramBin> {
    counts
        .into_iter()
        .map(|(bucket, count)| HistogramBin { bucket, count })
        .collect()
}

/// Month-of-subscription histogram for early-disabled 12-month records.
///
/// Bucket = `min(offset_days / 30 + 1, 12)`: 1-indexed, clamped so late
/// cancellations still land in month 12. Ascending, observed buckets only.
pub fn cancel_month_histogram(table: &SubscriptionTable) -> Vec<HistogramBin> {
    let mut counts = BTreeMap::new();
    for record in early_disabled_with_period(table, 12) {
        if let Some(offset_days) = record.days_start_to_disable() {
            let bucket = (offset_days / 30 + 1).min(12);
            *counts.entry(bucket).or_insert(0u64) += 1;
        }
    }
    to_bins(counts)
}

/// Day-of-subscription histogram for early-disabled 1-month records.
///
/// Raw day offsets with no clamping, ascending by day.
pub fn cancel_day_histogram(table: &SubscriptionTable) -> Vec<HistogramBin> {
    let mut counts = BTreeMap::new();
    for record in early_disabled_with_period(table, 1) {
        if let Some(offset_days) = record.days_start_to_disable() {
            *counts.entry(offset_days).or_insert(0u64) += 1;
        }
    }
    to_bins(counts)
}

/// Disables within the first week of a 12-month subscription.
///
/// Exactly 7 buckets (days 0..=6), zero-filled.
pub fn first_week_histogram(table: &SubscriptionTable) -> Vec<HistogramBin> {
    let mut counts = [0u64; 7];
    for record in early_disabled_with_period(table, 12) {
        if let Some(offset_days) = record.days_start_to_disable() {
            if (0..=6).contains(&offset_days) {
                counts[offset_days as usize] += 1;
            }
        }
    }
    counts
        .iter()
        .enumerate()
        .map(|(day, &count)| HistogramBin {
            bucket: day as i64,
            count,
        })
        .collect()
}

/// Disables within the last week of a 12-month subscription.
///
/// Bucket = days from `ar_valid_to` to `ended_at`, restricted to 1..=7.
/// Exactly 7 buckets ascending; consumers present them 7 down to 1.
pub fn last_week_histogram(table: &SubscriptionTable) -> Vec<HistogramBin> {
    let mut counts = [0u64; 7];
    for record in early_disabled_with_period(table, 12) {
        if let Some(days_before_end) = record.days_disable_to_end() {
            if (1..=7).contains(&days_before_end) {
                counts[(days_before_end - 1) as usize] += 1;
            }
        }
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            bucket: i as i64 + 1,
            count,
        })
        .collect()
}

/// Disables by calendar month of `ar_valid_to` for 12-month records.
///
/// Ordered by month number; only months with at least one occurrence appear.
pub fn disables_by_calendar_month(table: &SubscriptionTable) -> Vec<MonthBin> {
    let mut counts = BTreeMap::new();
    for record in early_disabled_with_period(table, 12) {
        if let Some(valid_to) = record.ar_valid_to {
            *counts.entry(valid_to.month()).or_insert(0u64) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthBin {
            month,
            name: month_name(month),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn early(
        period_months: i32,
        started: DateTime<Utc>,
        valid_to: DateTime<Utc>,
        ended: DateTime<Utc>,
    ) -> SubscriptionRecord {
        SubscriptionRecord {
            is_auto_renew: true,
            started_at: Some(started),
            ar_valid_to: Some(valid_to),
            ended_at: Some(ended),
            period_months: Some(period_months),
            ..Default::default()
        }
    }

    #[test]
    fn test_cancel_month_buckets() {
        let table = SubscriptionTable::new(vec![
            // Day 0 → month 1
            early(12, ts(2024, 1, 1), ts(2024, 1, 1), ts(2025, 1, 1)),
            // 152 days → month 6
            early(12, ts(2024, 1, 1), ts(2024, 6, 1), ts(2025, 1, 1)),
            early(12, ts(2024, 1, 1), ts(2024, 6, 1), ts(2025, 1, 1)),
            // 365 days → raw month 13, clamped to 12
            early(12, ts(2024, 1, 1), ts(2024, 12, 31), ts(2025, 1, 1)),
        ]);

        let bins = cancel_month_histogram(&table);
        let as_pairs: Vec<(i64, u64)> = bins.iter().map(|b| (b.bucket, b.count)).collect();
        assert_eq!(as_pairs, vec![(1, 1), (6, 2), (12, 1)]);
        assert!(bins.iter().all(|b| (1..=12).contains(&b.bucket)));
    }

    #[test]
    fn test_cancel_month_clamps_to_twelve() {
        // 400 days out: raw bucket would be 14
        let table = SubscriptionTable::new(vec![early(
            12,
            ts(2024, 1, 1),
            ts(2025, 2, 4),
            ts(2025, 3, 1),
        )]);
        let bins = cancel_month_histogram(&table);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].bucket, 12);
    }

    #[test]
    fn test_cancel_day_unclamped_and_ascending() {
        let table = SubscriptionTable::new(vec![
            early(1, ts(2024, 3, 1), ts(2024, 3, 15), ts(2024, 4, 1)),
            early(1, ts(2024, 3, 1), ts(2024, 3, 2), ts(2024, 4, 1)),
            early(1, ts(2024, 3, 1), ts(2024, 3, 2), ts(2024, 4, 1)),
            // 12-month record must not leak into the 1-month histogram
            early(12, ts(2024, 1, 1), ts(2024, 6, 1), ts(2025, 1, 1)),
        ]);

        let bins = cancel_day_histogram(&table);
        let as_pairs: Vec<(i64, u64)> = bins.iter().map(|b| (b.bucket, b.count)).collect();
        assert_eq!(as_pairs, vec![(1, 2), (14, 1)]);
    }

    #[test]
    fn test_first_week_zero_fill() {
        let table = SubscriptionTable::new(vec![
            early(12, ts(2024, 1, 1), ts(2024, 1, 1), ts(2025, 1, 1)), // day 0
            early(12, ts(2024, 1, 1), ts(2024, 1, 4), ts(2025, 1, 1)), // day 3
            early(12, ts(2024, 1, 1), ts(2024, 1, 20), ts(2025, 1, 1)), // outside window
        ]);

        let bins = first_week_histogram(&table);
        assert_eq!(bins.len(), 7);
        assert_eq!(
            bins.iter().map(|b| b.bucket).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 5, 6]
        );
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[3].count, 1);
        assert_eq!(bins[1].count, 0);
    }

    #[test]
    fn test_first_week_zero_fill_on_empty_table() {
        let table = SubscriptionTable::new(vec![]);
        let bins = first_week_histogram(&table);
        assert_eq!(bins.len(), 7);
        assert!(bins.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_last_week_window_and_zero_fill() {
        let table = SubscriptionTable::new(vec![
            // 1 day before end
            early(12, ts(2024, 1, 1), ts(2024, 12, 31), ts(2025, 1, 1)),
            // 7 days before end
            early(12, ts(2024, 1, 1), ts(2024, 12, 25), ts(2025, 1, 1)),
            // 8 days before end: outside the window
            early(12, ts(2024, 1, 1), ts(2024, 12, 24), ts(2025, 1, 1)),
        ]);

        let bins = last_week_histogram(&table);
        assert_eq!(bins.len(), 7);
        assert_eq!(
            bins.iter().map(|b| b.bucket).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6, 7]
        );
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[6].count, 1);
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), 2);
    }

    #[test]
    fn test_calendar_month_ordering_and_names() {
        let table = SubscriptionTable::new(vec![
            early(12, ts(2024, 1, 1), ts(2024, 11, 15), ts(2025, 1, 1)),
            early(12, ts(2024, 1, 1), ts(2024, 2, 10), ts(2025, 1, 1)),
            early(12, ts(2024, 1, 1), ts(2024, 11, 2), ts(2025, 1, 1)),
        ]);

        let bins = disables_by_calendar_month(&table);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].month, 2);
        assert_eq!(bins[0].name, "February");
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[1].month, 11);
        assert_eq!(bins[1].name, "November");
        assert_eq!(bins[1].count, 2);
    }

    #[test]
    fn test_histogram_sum_matches_filtered_count() {
        let table = SubscriptionTable::new(vec![
            early(12, ts(2024, 1, 1), ts(2024, 6, 1), ts(2025, 1, 1)),
            early(12, ts(2024, 2, 1), ts(2024, 3, 1), ts(2025, 2, 1)),
            early(1, ts(2024, 3, 1), ts(2024, 3, 2), ts(2024, 4, 1)),
            SubscriptionRecord::default(),
        ]);

        let qualifying = table
            .records()
            .iter()
            .filter(|r| r.period_months == Some(12))
            .filter(|r| r.disable_class() == Some(DisableClass::DisabledEarly))
            .count() as u64;

        let month_sum: u64 = cancel_month_histogram(&table).iter().map(|b| b.count).sum();
        assert_eq!(month_sum, qualifying);

        let calendar_sum: u64 = disables_by_calendar_month(&table)
            .iter()
            .map(|b| b.count)
            .sum();
        assert_eq!(calendar_sum, qualifying);
    }
}

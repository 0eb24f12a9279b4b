//! Dataset ingest: CSV source → canonical [`SubscriptionTable`]
//!
//! ## Design Principles
//!
//! 1. **Best-effort coercion**: a field that fails to parse becomes absent
//!    for that row only; the row stays in the table
//! 2. **Resilience**: per-field misses are counted and logged as warnings,
//!    never raised
//! 3. **Fatal only at the boundary**: the load fails only when the input
//!    cannot be read as tabular data at all

use crate::error::Result;
use crate::types::{SubscriptionRecord, SubscriptionTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// One row as it appears in the source file, before coercion.
///
/// Every field is optional text; `#[serde(default)]` tolerates datasets
/// missing whole columns. Columns outside this set are ignored.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(default)]
    is_auto_renew: Option<String>,
    #[serde(default)]
    started_at: Option<String>,
    #[serde(default)]
    ar_valid_to: Option<String>,
    #[serde(default)]
    ended_at: Option<String>,
    #[serde(default)]
    period_months: Option<String>,
    #[serde(default)]
    payment_gateway: Option<String>,
    #[serde(default)]
    product_sub_group: Option<String>,
    #[serde(default)]
    billings_eur_excl_vat: Option<String>,
}

/// Per-field coercion miss counts for one load.
///
/// Reported once after the load so a noisy dataset produces one summary
/// warning instead of a warning per row.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows that made it into the table
    pub rows_loaded: usize,
    /// Rows the reader could not decode at all (skipped)
    pub rows_skipped: usize,
    /// `started_at` values that failed to parse
    pub bad_started_at: usize,
    /// `ar_valid_to` values that failed to parse
    pub bad_ar_valid_to: usize,
    /// `ended_at` values that failed to parse
    pub bad_ended_at: usize,
    /// `period_months` values that failed to parse
    pub bad_period_months: usize,
    /// `billings_eur_excl_vat` values that failed to parse
    pub bad_billings: usize,
}

impl LoadSummary {
    /// Total coercion misses across all fields.
    pub fn total_misses(&self) -> usize {
        self.bad_started_at
            + self.bad_ar_valid_to
            + self.bad_ended_at
            + self.bad_period_months
            + self.bad_billings
    }
}

/// Load and normalize a subscription dataset from a CSV file.
///
/// Returns the immutable table plus a summary of coercion misses. Fails only
/// when the file cannot be opened or read as CSV.
pub fn load_csv(path: &Path) -> Result<(SubscriptionTable, LoadSummary)> {
    tracing::info!(path = %path.display(), "Loading subscription dataset");
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    load_from_reader(&mut reader)
}

/// Load from any CSV reader (used by tests to load from byte buffers).
pub fn load_from_reader<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
) -> Result<(SubscriptionTable, LoadSummary)> {
    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for row in reader.deserialize::<RawRow>() {
        let raw = match row {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable row");
                summary.rows_skipped += 1;
                continue;
            }
        };
        records.push(normalize_row(raw, &mut summary));
        summary.rows_loaded += 1;
    }

    if summary.total_misses() > 0 || summary.rows_skipped > 0 {
        tracing::warn!(
            rows = summary.rows_loaded,
            skipped = summary.rows_skipped,
            coercion_misses = summary.total_misses(),
            "Dataset loaded with degraded fields"
        );
    } else {
        tracing::info!(rows = summary.rows_loaded, "Dataset loaded");
    }

    Ok((SubscriptionTable::new(records), summary))
}

fn normalize_row(raw: RawRow, summary: &mut LoadSummary) -> SubscriptionRecord {
    let started_at = parse_timestamp_counted(raw.started_at.as_deref(), &mut summary.bad_started_at);
    let ar_valid_to =
        parse_timestamp_counted(raw.ar_valid_to.as_deref(), &mut summary.bad_ar_valid_to);
    let ended_at = parse_timestamp_counted(raw.ended_at.as_deref(), &mut summary.bad_ended_at);

    let period_months = match raw.period_months.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match parse_period(value) {
            Some(months) => Some(months),
            None => {
                summary.bad_period_months += 1;
                None
            }
        },
    };

    let billings_eur_excl_vat = match raw.billings_eur_excl_vat.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => match value.parse::<f64>() {
            Ok(amount) if amount.is_finite() => Some(amount),
            _ => {
                summary.bad_billings += 1;
                None
            }
        },
    };

    SubscriptionRecord {
        is_auto_renew: parse_bool(raw.is_auto_renew.as_deref()),
        started_at,
        ar_valid_to,
        ended_at,
        period_months,
        payment_gateway: non_empty(raw.payment_gateway).unwrap_or_else(|| "unknown".to_string()),
        product_sub_group: non_empty(raw.product_sub_group),
        billings_eur_excl_vat,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Coerce a source value to bool; absent or unparseable values are false.
fn parse_bool(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(v) => matches!(
            v.to_ascii_lowercase().as_str(),
            "true" | "t" | "yes" | "y" | "1"
        ),
        None => false,
    }
}

/// Parse a timestamp, trying RFC 3339 then common date-time layouts.
///
/// Unparseable or missing values are `None`, never an error.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn parse_timestamp_counted(value: Option<&str>, misses: &mut usize) -> Option<DateTime<Utc>> {
    match value.map(str::trim) {
        None | Some("") => None,
        Some(v) => match parse_timestamp(v) {
            Some(ts) => Some(ts),
            None => {
                *misses += 1;
                None
            }
        },
    }
}

/// Parse a period length, tolerating float renderings like "12.0".
fn parse_period(value: &str) -> Option<i32> {
    if let Ok(months) = value.parse::<i32>() {
        return Some(months);
    }
    let as_float = value.parse::<f64>().ok()?;
    if as_float.is_finite() && as_float.fract() == 0.0 {
        Some(as_float as i32)
    } else {
        None
    }
}

//! Core domain types for renewscope
//!
//! These types represent the canonical data model: one flat, immutable table
//! of subscription records built once by the loader and shared read-only by
//! every aggregate query.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Record** | One subscription row from the source dataset |
//! | **Table** | The full normalized dataset, immutable after load |
//! | **Cohort** | The base population for an analysis (e.g., all auto-renew ON 12-month subscriptions) |
//! | **Early disable** | Auto-renew turned off strictly before the subscription's actual end date |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Subscription record
// ============================================

/// A single normalized subscription record.
///
/// Field coercion happens in the loader; by the time a record lands here,
/// every field is either a parsed value or an explicit absence. Queries must
/// treat absence as "exclude from time math", never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Whether auto-renew was enabled; absent/unparseable source values are false
    pub is_auto_renew: bool,
    /// When the subscription started
    pub started_at: Option<DateTime<Utc>>,
    /// The moment auto-renew was last known valid (the disable boundary, if any)
    pub ar_valid_to: Option<DateTime<Utc>>,
    /// When the billing period actually ended
    pub ended_at: Option<DateTime<Utc>>,
    /// Nominal subscription length in months; only 1 and 12 are first-class
    pub period_months: Option<i32>,
    /// Payment gateway, "unknown" when the source is absent or empty
    pub payment_gateway: String,
    /// Product sub-group, used only for grouping
    pub product_sub_group: Option<String>,
    /// Billed amount in EUR excluding VAT
    pub billings_eur_excl_vat: Option<f64>,
}

impl Default for SubscriptionRecord {
    fn default() -> Self {
        Self {
            is_auto_renew: false,
            started_at: None,
            ar_valid_to: None,
            ended_at: None,
            period_months: None,
            payment_gateway: "unknown".to_string(),
            product_sub_group: None,
            billings_eur_excl_vat: None,
        }
    }
}

/// Classification of an auto-renew ON record by when the renewal was disabled.
///
/// Only defined when both `ar_valid_to` and `ended_at` are present; records
/// missing either timestamp fall in neither bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisableClass {
    /// `ar_valid_to < ended_at`: auto-renew was turned off before the period ended
    DisabledEarly,
    /// `ar_valid_to >= ended_at`: auto-renew stayed valid through the period end
    ActiveUntilEnd,
}

impl DisableClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisableClass::DisabledEarly => "Disabled Early",
            DisableClass::ActiveUntilEnd => "Active Until End",
        }
    }
}

/// Whole days from `a` to `b`, truncating toward zero.
///
/// Negative when `b` precedes `a`; callers filter to non-negative ranges
/// where the analysis requires it.
pub fn days_between(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    b.signed_duration_since(a).num_days()
}

impl SubscriptionRecord {
    /// Classify this record as disabled-early vs active-until-end.
    ///
    /// `None` when auto-renew is off or either timestamp is missing.
    pub fn disable_class(&self) -> Option<DisableClass> {
        if !self.is_auto_renew {
            return None;
        }
        let valid_to = self.ar_valid_to?;
        let ended = self.ended_at?;
        if valid_to < ended {
            Some(DisableClass::DisabledEarly)
        } else {
            Some(DisableClass::ActiveUntilEnd)
        }
    }

    /// Whole days from subscription start to the auto-renew disable boundary.
    pub fn days_start_to_disable(&self) -> Option<i64> {
        Some(days_between(self.started_at?, self.ar_valid_to?))
    }

    /// Whole days from the auto-renew disable boundary to the period end.
    pub fn days_disable_to_end(&self) -> Option<i64> {
        Some(days_between(self.ar_valid_to?, self.ended_at?))
    }
}

// ============================================
// Subscription table
// ============================================

/// The normalized dataset: built once by the loader, then read-only.
///
/// Every aggregate query takes `&SubscriptionTable` and produces a new
/// derived table; nothing mutates the source after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscriptionTable {
    records: Vec<SubscriptionRecord>,
}

impl SubscriptionTable {
    pub fn new(records: Vec<SubscriptionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SubscriptionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

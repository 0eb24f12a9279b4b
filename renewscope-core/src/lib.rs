//! # renewscope-core
//!
//! Core library for renewscope - subscription auto-renew analytics.
//!
//! This library provides:
//! - Domain types for the normalized subscription table
//! - CSV ingest with best-effort field coercion
//! - The aggregation engine (status, timing, cohort, billing queries)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three stages:
//! - **Source:** a flat CSV of subscription records
//! - **Table:** one normalized, immutable [`SubscriptionTable`] built at load
//! - **Derived:** each aggregate query is a pure function from the shared
//!   table to a new result table; nothing mutates the source after load
//!
//! ## Example
//!
//! ```rust,no_run
//! use renewscope_core::analytics::{generate_report, ReportConfig};
//! use renewscope_core::ingest::load_csv;
//! use std::path::Path;
//!
//! let (table, _summary) = load_csv(Path::new("subscriptions.csv"))
//!     .expect("failed to load dataset");
//! let stats = generate_report(&table, &ReportConfig::default());
//! println!("{} records", stats.record_count);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::{days_between, DisableClass, SubscriptionRecord, SubscriptionTable};

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod types;

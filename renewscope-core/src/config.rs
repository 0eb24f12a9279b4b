//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/renewscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/renewscope/` (~/.config/renewscope/)
//! - State/Logs: `$XDG_STATE_HOME/renewscope/` (~/.local/state/renewscope/)

use crate::analytics::ReportConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report tuning
    #[serde(default)]
    pub report: ReportSection,

    /// Default dataset path (overridable on the command line)
    #[serde(default)]
    pub dataset: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Report tuning knobs
#[derive(Debug, Deserialize)]
pub struct ReportSection {
    /// Number of product sub-groups to keep in the group summary
    #[serde(default = "default_top_product_groups")]
    pub top_product_groups: usize,

    /// Minimum cohort total for a payment gateway to appear
    #[serde(default = "default_min_gateway_total")]
    pub min_gateway_total: u64,

    /// Upper bound (EUR) of the zoomed billing curve
    #[serde(default = "default_zoom_max_eur")]
    pub zoom_max_eur: i64,
}

fn default_top_product_groups() -> usize {
    5
}

fn default_min_gateway_total() -> u64 {
    100
}

fn default_zoom_max_eur() -> i64 {
    8
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            top_product_groups: default_top_product_groups(),
            min_gateway_total: default_min_gateway_total(),
            zoom_max_eur: default_zoom_max_eur(),
        }
    }
}

impl ReportSection {
    /// Convert to the analytics layer's config.
    pub fn to_report_config(&self) -> ReportConfig {
        ReportConfig {
            top_product_groups: self.top_product_groups,
            min_gateway_total: self.min_gateway_total,
            zoom_max_eur: self.zoom_max_eur,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("renewscope").join("config.toml")
    }

    /// Directory for logs and other state.
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("renewscope")
    }

    /// Load configuration from the default location.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("invalid config at {}: {}", path.display(), e)))
    }
}

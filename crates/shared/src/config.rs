//! Application configuration management.

use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Aging engine configuration.
    #[serde(default)]
    pub aging: AgingSettings,
    /// Output configuration.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Aging engine configuration.
///
/// `buckets` and `rates` override the named preset when non-empty.
/// Values here are unvalidated; the core crate turns them into a bucket
/// definition and a provision rule table.
#[derive(Debug, Clone, Deserialize)]
pub struct AgingSettings {
    /// Named regulatory preset (e.g. `syscohada_standard`).
    #[serde(default = "default_preset")]
    pub preset: String,
    /// Report kind (`receivable` or `payable`).
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Custom overdue buckets.
    #[serde(default)]
    pub buckets: Vec<BucketSetting>,
    /// Custom provision rates keyed by bucket label.
    #[serde(default)]
    pub rates: BTreeMap<String, Decimal>,
    /// Whether rollups carry their aged items.
    #[serde(default)]
    pub include_items: bool,
}

fn default_preset() -> String {
    "syscohada_standard".to_string()
}

fn default_kind() -> String {
    "receivable".to_string()
}

impl Default for AgingSettings {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            kind: default_kind(),
            buckets: Vec::new(),
            rates: BTreeMap::new(),
            include_items: false,
        }
    }
}

/// One overdue bucket as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BucketSetting {
    /// Bucket label.
    pub label: String,
    /// Inclusive lower bound in days overdue.
    pub min_days: i64,
    /// Exclusive upper bound in days overdue; absent for the last bucket.
    #[serde(default)]
    pub max_days: Option<i64>,
}

/// Output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSettings {
    /// Pretty-print JSON reports.
    #[serde(default)]
    pub pretty: bool,
    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json_logs: bool,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None)
    }

    /// Loads configuration, layering an explicit file over the defaults.
    ///
    /// Sources, lowest precedence first: `config/default`,
    /// `config/{RUN_MODE}`, `extra` (required when given), then
    /// `OHADA__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load_with(extra: Option<&Path>) -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false));

        if let Some(path) = extra {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix("OHADA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

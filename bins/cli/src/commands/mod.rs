//! Command implementations.

pub mod presets;
pub mod report;
pub mod series;

pub use report::ReportArgs;
pub use series::SeriesArgs;

use clap::Args;
use ohada_core::aging::AgingReportBuilder;
use ohada_shared::config::AgingSettings;
use ohada_shared::{AppConfig, AppResult};
use tracing::info;

/// Aging options shared by the report-building commands.
#[derive(Args, Debug, Default, Clone)]
pub struct AgingOverrides {
    /// Regulatory preset (syscohada_standard, syscohada_art45); replaces configured buckets and rates
    #[arg(long)]
    pub preset: Option<String>,

    /// Report kind (receivable, payable)
    #[arg(long)]
    pub kind: Option<String>,

    /// Include the aged items of each counterparty
    #[arg(long)]
    pub detail: bool,
}

impl AgingOverrides {
    /// Applies the command-line overrides on top of configured settings.
    pub fn apply(&self, mut settings: AgingSettings) -> AgingSettings {
        if let Some(preset) = &self.preset {
            settings.preset.clone_from(preset);
            settings.buckets.clear();
            settings.rates.clear();
        }
        if let Some(kind) = &self.kind {
            settings.kind.clone_from(kind);
        }
        if self.detail {
            settings.include_items = true;
        }
        settings
    }
}

/// Resolves the report builder from configuration and overrides.
pub fn builder(config: &AppConfig, overrides: &AgingOverrides) -> AppResult<AgingReportBuilder> {
    let settings = overrides.apply(config.aging.clone());
    let builder = AgingReportBuilder::from_settings(&settings)?;

    info!(
        preset = %settings.preset,
        custom_buckets = !settings.buckets.is_empty(),
        custom_rates = !settings.rates.is_empty(),
        buckets = builder.definition().slot_count(),
        "Aging configuration resolved"
    );

    Ok(builder)
}

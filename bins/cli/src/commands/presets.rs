//! Presets command implementation.

use ohada_core::aging::{BucketDefinition, ProvisionRuleTable, RegulatoryPreset};
use ohada_shared::{AppConfig, AppResult};
use serde::Serialize;

use crate::io::print_json;

/// A shipped preset as printed by the presets command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    /// Configuration name.
    pub name: &'static str,
    /// Whether this is the configured preset.
    pub configured: bool,
    /// Overdue buckets.
    pub bucket_definition: BucketDefinition,
    /// Provision rates.
    pub rule_table: ProvisionRuleTable,
    /// Whether rates never decrease with age.
    pub monotonic: bool,
}

impl PresetSummary {
    fn new(preset: RegulatoryPreset, configured: &str) -> Self {
        let bucket_definition = preset.bucket_definition();
        let rule_table = preset.rule_table();
        Self {
            name: preset.name(),
            configured: configured
                .parse::<RegulatoryPreset>()
                .is_ok_and(|wanted| wanted == preset),
            monotonic: rule_table.is_monotonic(&bucket_definition),
            bucket_definition,
            rule_table,
        }
    }
}

/// Executes the presets command.
pub fn execute(config: &AppConfig) -> AppResult<()> {
    let summaries: Vec<PresetSummary> = RegulatoryPreset::ALL
        .into_iter()
        .map(|preset| PresetSummary::new(preset, &config.aging.preset))
        .collect();

    print_json(&summaries, config.output.pretty)
}

//! Named regulatory presets and configuration resolution.

use ohada_shared::config::AgingSettings;
use serde::{Deserialize, Serialize};

use super::bucket::{BucketBound, BucketDefinition, BucketLabel};
use super::error::ConfigurationError;
use super::rules::{ProvisionRule, ProvisionRuleTable};

/// A regulatory regime shipped with the engine.
///
/// The supplier ledger applies 20% at 61-90 days and 50% beyond 90 days,
/// while the Art. 45 notes describe 50% beyond six months and 100% beyond
/// twelve. Both ship; neither is implied as the default by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatoryPreset {
    /// 30/60/90 day buckets, 61-90 at 20%, 90+ at 50%.
    SyscohadaStandard,
    /// Six/twelve month buckets, 6-12 months at 50%, 12+ at 100%.
    SyscohadaArt45,
}

impl RegulatoryPreset {
    /// Every shipped preset.
    pub const ALL: [Self; 2] = [Self::SyscohadaStandard, Self::SyscohadaArt45];

    /// Configuration name of the preset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SyscohadaStandard => "syscohada_standard",
            Self::SyscohadaArt45 => "syscohada_art45",
        }
    }

    /// Bucket definition of the preset.
    #[must_use]
    pub fn bucket_definition(self) -> BucketDefinition {
        match self {
            Self::SyscohadaStandard => BucketDefinition::standard(),
            Self::SyscohadaArt45 => BucketDefinition::art45_months(),
        }
    }

    /// Rule table of the preset.
    #[must_use]
    pub fn rule_table(self) -> ProvisionRuleTable {
        match self {
            Self::SyscohadaStandard => ProvisionRuleTable::syscohada_standard(),
            Self::SyscohadaArt45 => ProvisionRuleTable::syscohada_art45(),
        }
    }
}

impl std::fmt::Display for RegulatoryPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for RegulatoryPreset {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| ConfigurationError::UnknownPreset(s.to_string()))
    }
}

/// Turns configuration into a validated bucket definition and rule table.
///
/// Custom `buckets` and `rates` replace the preset's when non-empty.
/// Custom buckets without rates get an empty rule table, so every bucket
/// provisions at 0. Labels are upper-cased, since environment overrides
/// arrive lower-case.
///
/// # Errors
///
/// Returns `ConfigurationError` for an unknown preset or an invalid custom
/// bucket list or rate table.
pub fn resolve_settings(
    settings: &AgingSettings,
) -> Result<(BucketDefinition, ProvisionRuleTable), ConfigurationError> {
    let preset: RegulatoryPreset = settings.preset.parse()?;

    let definition = if settings.buckets.is_empty() {
        preset.bucket_definition()
    } else {
        BucketDefinition::new(
            settings
                .buckets
                .iter()
                .map(|b| BucketBound {
                    label: BucketLabel::new(b.label.to_uppercase()),
                    min_days_overdue: b.min_days,
                    max_days_overdue: b.max_days,
                })
                .collect(),
        )?
    };

    let rules = if !settings.rates.is_empty() {
        ProvisionRuleTable::new(
            Some("CUSTOM".to_string()),
            settings
                .rates
                .iter()
                .map(|(label, rate)| ProvisionRule::new(label.to_uppercase(), *rate)),
        )?
    } else if settings.buckets.is_empty() {
        preset.rule_table()
    } else {
        ProvisionRuleTable::empty()
    };

    Ok((definition, rules))
}

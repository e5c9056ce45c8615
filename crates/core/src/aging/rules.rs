//! Provisioning rule tables.
//!
//! A rule table maps bucket labels to provision rates in `[0, 1]`.
//! Buckets without a rule are provisioned at 0. Tables are immutable:
//! switching regime means building a new table.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::bucket::{BucketDefinition, BucketLabel};
use super::error::ConfigurationError;

/// Name of the 61-90 → 20%, 90+ → 50% supplier-ledger regime.
pub const SYSCOHADA_STANDARD: &str = "SYSCOHADA_STANDARD";

/// Name of the Art. 45 six months → 50%, twelve months → 100% regime.
pub const SYSCOHADA_ART45: &str = "SYSCOHADA_ART45";

/// Maximum number of fractional digits in a rate.
///
/// Bounds the size of `amount * rate` so provision arithmetic on 64-bit
/// minor units never loses precision in a `Decimal`.
pub const MAX_RATE_SCALE: u32 = 6;

/// One `(bucket, rate)` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionRule {
    /// Bucket the rate applies to.
    pub bucket: BucketLabel,
    /// Provision rate in `[0, 1]`.
    pub rate: Decimal,
}

impl ProvisionRule {
    /// Creates a rule.
    #[must_use]
    pub fn new(bucket: impl Into<String>, rate: Decimal) -> Self {
        Self {
            bucket: BucketLabel::new(bucket),
            rate,
        }
    }
}

#[derive(Deserialize)]
struct RawRuleTable {
    #[serde(default)]
    name: Option<String>,
    rates: BTreeMap<BucketLabel, Decimal>,
}

/// Immutable mapping from bucket label to provision rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRuleTable")]
pub struct ProvisionRuleTable {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    rates: BTreeMap<BucketLabel, Decimal>,
}

impl ProvisionRuleTable {
    /// Validates and creates a rule table.
    ///
    /// Rates are stored normalized, so `1.000` and `1` are the same rule.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for blank labels, duplicate rules,
    /// rates outside `[0, 1]` or with more than [`MAX_RATE_SCALE`]
    /// decimal places.
    pub fn new(
        name: Option<String>,
        rules: impl IntoIterator<Item = ProvisionRule>,
    ) -> Result<Self, ConfigurationError> {
        let mut rates = BTreeMap::new();
        for rule in rules {
            validate_rule(&rule)?;
            let label = rule.bucket.to_string();
            if rates.insert(rule.bucket, rule.rate.normalize()).is_some() {
                return Err(ConfigurationError::DuplicateRule(label));
            }
        }
        Ok(Self { name, rates })
    }

    /// Table with no rules: every bucket provisions at 0.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            name: None,
            rates: BTreeMap::new(),
        }
    }

    /// Supplier-ledger regime: 61-90 days at 20%, over 90 days at 50%.
    ///
    /// Pairs with [`BucketDefinition::standard`].
    #[must_use]
    pub fn syscohada_standard() -> Self {
        Self {
            name: Some(SYSCOHADA_STANDARD.to_string()),
            rates: BTreeMap::from([
                (BucketLabel::from("DAYS_61_90"), Decimal::new(2, 1)),
                (BucketLabel::from("DAYS_90_PLUS"), Decimal::new(5, 1)),
            ]),
        }
    }

    /// Art. 45 regime: over six months at 50%, over twelve months at 100%.
    ///
    /// Pairs with [`BucketDefinition::art45_months`].
    #[must_use]
    pub fn syscohada_art45() -> Self {
        Self {
            name: Some(SYSCOHADA_ART45.to_string()),
            rates: BTreeMap::from([
                (BucketLabel::from("MONTHS_6_12"), Decimal::new(5, 1)),
                (BucketLabel::from("MONTHS_12_PLUS"), Decimal::ONE),
            ]),
        }
    }

    /// Regime name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rate for a bucket, 0 when the bucket has no rule.
    #[must_use]
    pub fn rate_for(&self, bucket: &BucketLabel) -> Decimal {
        self.rates.get(bucket).copied().unwrap_or(Decimal::ZERO)
    }

    /// Configured rules in label order.
    pub fn rules(&self) -> impl Iterator<Item = (&BucketLabel, Decimal)> {
        self.rates.iter().map(|(label, rate)| (label, *rate))
    }

    /// Checks that every rule names a bucket of `definition`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownRuleBucket` for the first
    /// unknown label.
    pub fn check_against(&self, definition: &BucketDefinition) -> Result<(), ConfigurationError> {
        match self.rates.keys().find(|label| !definition.contains_label(label)) {
            Some(label) => Err(ConfigurationError::UnknownRuleBucket(label.to_string())),
            None => Ok(()),
        }
    }

    /// Returns true if rates never decrease from younger to older buckets.
    #[must_use]
    pub fn is_monotonic(&self, definition: &BucketDefinition) -> bool {
        let rates: Vec<Decimal> = definition.labels().map(|l| self.rate_for(l)).collect();
        rates.windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Rate for a bucket, 0 when the table has no rule for it.
#[must_use]
pub fn rate_for(bucket: &BucketLabel, table: &ProvisionRuleTable) -> Decimal {
    table.rate_for(bucket)
}

impl TryFrom<RawRuleTable> for ProvisionRuleTable {
    type Error = ConfigurationError;

    fn try_from(raw: RawRuleTable) -> Result<Self, Self::Error> {
        Self::new(
            raw.name,
            raw.rates
                .into_iter()
                .map(|(bucket, rate)| ProvisionRule { bucket, rate }),
        )
    }
}

fn validate_rule(rule: &ProvisionRule) -> Result<(), ConfigurationError> {
    let label = rule.bucket.as_str();
    if label.trim().is_empty() {
        return Err(ConfigurationError::BlankRuleLabel);
    }
    if rule.rate < Decimal::ZERO || rule.rate > Decimal::ONE {
        return Err(ConfigurationError::RateOutOfRange {
            label: label.to_string(),
            rate: rule.rate,
        });
    }
    if rule.rate.normalize().scale() > MAX_RATE_SCALE {
        return Err(ConfigurationError::RatePrecision {
            label: label.to_string(),
            rate: rule.rate,
            max_scale: MAX_RATE_SCALE,
        });
    }
    Ok(())
}

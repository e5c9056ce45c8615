//! Aging report builder.

use chrono::NaiveDate;
use ohada_shared::config::AgingSettings;
use ohada_shared::types::CurrencyCode;
use rayon::prelude::*;

use super::aggregate::Aggregator;
use super::bucket::BucketDefinition;
use super::error::{AgingError, ConfigurationError, ValidationError};
use super::presets::{RegulatoryPreset, resolve_settings};
use super::rules::ProvisionRuleTable;
use super::types::{AgingReport, LedgerItem, ReportKind};
use super::validation::validate_items;

/// Builds immutable aging reports from ledger snapshots.
///
/// Holds a bucket definition and rule table that were checked against each
/// other once; every `build` reuses them. The builder has no mutable state
/// and can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgingReportBuilder {
    definition: BucketDefinition,
    rules: ProvisionRuleTable,
    kind: ReportKind,
    include_items: bool,
}

impl AgingReportBuilder {
    /// Creates a builder.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::UnknownRuleBucket` if the rule table
    /// names a bucket that `definition` does not have.
    pub fn new(
        definition: BucketDefinition,
        rules: ProvisionRuleTable,
    ) -> Result<Self, ConfigurationError> {
        rules.check_against(&definition)?;
        Ok(Self {
            definition,
            rules,
            kind: ReportKind::default(),
            include_items: false,
        })
    }

    /// Creates a builder for a shipped regulatory preset.
    #[must_use]
    pub fn from_preset(preset: RegulatoryPreset) -> Self {
        Self {
            definition: preset.bucket_definition(),
            rules: preset.rule_table(),
            kind: ReportKind::default(),
            include_items: false,
        }
    }

    /// Creates a builder from application configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the preset, buckets, rates or report
    /// kind are invalid.
    pub fn from_settings(settings: &AgingSettings) -> Result<Self, ConfigurationError> {
        let (definition, rules) = resolve_settings(settings)?;
        let kind = settings.kind.parse()?;
        Ok(Self::new(definition, rules)?
            .kind(kind)
            .include_items(settings.include_items))
    }

    /// Sets the report kind.
    #[must_use]
    pub fn kind(mut self, kind: ReportKind) -> Self {
        self.kind = kind;
        self
    }

    /// Keeps aged items in each rollup.
    #[must_use]
    pub fn include_items(mut self, include_items: bool) -> Self {
        self.include_items = include_items;
        self
    }

    /// Bucket definition in use.
    #[must_use]
    pub fn definition(&self) -> &BucketDefinition {
        &self.definition
    }

    /// Rule table in use.
    #[must_use]
    pub fn rules(&self) -> &ProvisionRuleTable {
        &self.rules
    }

    /// Builds the report for one as-of date.
    ///
    /// Either returns a complete report or fails; there is no partial
    /// result.
    ///
    /// # Errors
    ///
    /// Returns `AgingError::Validation` listing every offending item.
    pub fn build(&self, items: &[LedgerItem], as_of: NaiveDate) -> Result<AgingReport, AgingError> {
        let currency = validate_items(items)?;
        Ok(self.assemble(items, as_of, currency)?)
    }

    /// Builds one report per as-of date, in parallel.
    ///
    /// Items are validated once. Reports come back in the order of
    /// `as_of_dates` and equal what [`build`](Self::build) returns for the
    /// same date.
    ///
    /// # Errors
    ///
    /// Returns `AgingError::Validation` listing every offending item.
    pub fn build_series(
        &self,
        items: &[LedgerItem],
        as_of_dates: &[NaiveDate],
    ) -> Result<Vec<AgingReport>, AgingError> {
        let currency = validate_items(items)?;
        let reports = as_of_dates
            .par_iter()
            .map(|as_of| self.assemble(items, *as_of, currency.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reports)
    }

    fn assemble(
        &self,
        items: &[LedgerItem],
        as_of: NaiveDate,
        currency: Option<CurrencyCode>,
    ) -> Result<AgingReport, ValidationError> {
        let aggregation = Aggregator::new(as_of, &self.definition, &self.rules)
            .with_items(self.include_items)
            .fold(items)?;

        Ok(AgingReport::new(
            self.kind,
            currency,
            as_of,
            self.definition.clone(),
            self.rules.clone(),
            aggregation.rollups,
            aggregation.grand_total,
        ))
    }
}

/// Builds a receivable aging report.
///
/// # Errors
///
/// Returns `AgingError::Configuration` if the rule table names a bucket
/// missing from `definition`, or `AgingError::Validation` listing every
/// offending item.
pub fn build(
    items: &[LedgerItem],
    as_of: NaiveDate,
    definition: &BucketDefinition,
    rules: &ProvisionRuleTable,
) -> Result<AgingReport, AgingError> {
    AgingReportBuilder::new(definition.clone(), rules.clone())?.build(items, as_of)
}

/// Builds one receivable aging report per as-of date, in parallel.
///
/// # Errors
///
/// Same as [`build`].
pub fn build_series(
    items: &[LedgerItem],
    as_of_dates: &[NaiveDate],
    definition: &BucketDefinition,
    rules: &ProvisionRuleTable,
) -> Result<Vec<AgingReport>, AgingError> {
    AgingReportBuilder::new(definition.clone(), rules.clone())?.build_series(items, as_of_dates)
}

//! Aging data types.

use chrono::NaiveDate;
use ohada_shared::types::{CounterpartyId, CurrencyCode, ItemId, MinorUnits};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::bucket::{BucketDefinition, BucketLabel};
use super::error::ConfigurationError;
use super::rules::ProvisionRuleTable;

/// One outstanding receivable or payable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerItem {
    /// Item ID, unique within a report.
    pub id: ItemId,
    /// Counterparty ID.
    pub counterparty_id: CounterpartyId,
    /// Counterparty display name.
    pub counterparty_name: String,
    /// Outstanding amount in minor units, never negative.
    pub amount: MinorUnits,
    /// Date the amount becomes payable or collectible.
    pub due_date: NaiveDate,
    /// Currency code.
    pub currency: CurrencyCode,
}

/// Direction of the aged balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// Amounts owed by customers.
    #[default]
    Receivable,
    /// Amounts owed to suppliers.
    Payable,
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Receivable => write!(f, "receivable"),
            Self::Payable => write!(f, "payable"),
        }
    }
}

impl std::str::FromStr for ReportKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receivable" | "receivables" | "customer" => Ok(Self::Receivable),
            "payable" | "payables" | "supplier" => Ok(Self::Payable),
            _ => Err(ConfigurationError::UnknownReportKind(s.to_string())),
        }
    }
}

/// A classified ledger item, kept for drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgedItem {
    /// Item ID.
    pub id: ItemId,
    /// Due date.
    pub due_date: NaiveDate,
    /// Days past due at the as-of date; zero or negative when not due.
    pub days_overdue: i64,
    /// Assigned bucket.
    pub bucket: BucketLabel,
    /// Amount in minor units.
    pub amount: MinorUnits,
}

/// Amounts per bucket, in bucket-definition order.
///
/// Serialized as a JSON object whose keys keep that order, `NOT_DUE`
/// first. Every bucket of the definition is present, zero or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketTotals(Vec<(BucketLabel, MinorUnits)>);

impl BucketTotals {
    /// All-zero totals for every bucket of `definition`.
    #[must_use]
    pub fn zeroed(definition: &BucketDefinition) -> Self {
        Self(
            definition
                .labels()
                .map(|label| (label.clone(), MinorUnits::ZERO))
                .collect(),
        )
    }

    /// Amount in `bucket`, zero if the bucket is unknown.
    #[must_use]
    pub fn get(&self, bucket: &BucketLabel) -> MinorUnits {
        self.0
            .iter()
            .find(|(label, _)| label == bucket)
            .map_or(MinorUnits::ZERO, |(_, amount)| *amount)
    }

    /// `(bucket, amount)` pairs in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketLabel, MinorUnits)> {
        self.0.iter().map(|(label, amount)| (label, *amount))
    }

    /// Amounts in bucket order.
    pub fn amounts(&self) -> impl Iterator<Item = MinorUnits> + '_ {
        self.0.iter().map(|(_, amount)| *amount)
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum over all buckets.
    #[must_use]
    pub fn total(&self) -> MinorUnits {
        self.amounts().sum()
    }

    /// Adds `amount` to one bucket, `None` on overflow.
    pub(crate) fn add_to_slot(&mut self, slot: usize, amount: MinorUnits) -> Option<()> {
        let entry = &mut self.0[slot].1;
        *entry = entry.checked_add(amount)?;
        Some(())
    }

    /// Adds `other` bucket by bucket, `None` on overflow. Both come from
    /// the same definition.
    pub(crate) fn absorb(&mut self, other: &Self) -> Option<()> {
        for (mine, (_, theirs)) in self.0.iter_mut().zip(&other.0) {
            mine.1 = mine.1.checked_add(*theirs)?;
        }
        Some(())
    }
}

impl Serialize for BucketTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, amount) in &self.0 {
            map.serialize_entry(label, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BucketTotals {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TotalsVisitor;

        impl<'de> Visitor<'de> for TotalsVisitor {
            type Value = BucketTotals;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a map of bucket label to minor-unit amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((label, amount)) = access.next_entry::<BucketLabel, MinorUnits>()? {
                    entries.push((label, amount));
                }
                Ok(BucketTotals(entries))
            }
        }

        deserializer.deserialize_map(TotalsVisitor)
    }
}

/// Aging figures for one counterparty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterpartyRollup {
    /// Counterparty ID.
    pub counterparty_id: CounterpartyId,
    /// Counterparty name.
    pub counterparty_name: String,
    /// Amount per bucket.
    pub bucket_totals: BucketTotals,
    /// Sum of `bucket_totals`.
    pub total_debt: MinorUnits,
    /// Total minus the `NOT_DUE` bucket.
    pub overdue_debt: MinorUnits,
    /// Provision, rounded half-up once on the aggregate.
    pub provision: MinorUnits,
    /// Total minus provision.
    pub net_debt: MinorUnits,
    /// Aged items, present only when drill-down was requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<AgedItem>,
}

/// Report-wide totals, summed from the counterparty rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingTotals {
    /// Amount per bucket.
    pub bucket_totals: BucketTotals,
    /// Sum of `bucket_totals`.
    pub total_debt: MinorUnits,
    /// Total minus the `NOT_DUE` bucket.
    pub overdue_debt: MinorUnits,
    /// Sum of rollup provisions.
    pub provision: MinorUnits,
    /// Total minus provision.
    pub net_debt: MinorUnits,
    /// Number of counterparties.
    pub counterparty_count: usize,
    /// Number of ledger items.
    pub item_count: usize,
}

impl AgingTotals {
    /// All-zero totals for `definition`.
    #[must_use]
    pub fn zeroed(definition: &BucketDefinition) -> Self {
        Self {
            bucket_totals: BucketTotals::zeroed(definition),
            total_debt: MinorUnits::ZERO,
            overdue_debt: MinorUnits::ZERO,
            provision: MinorUnits::ZERO,
            net_debt: MinorUnits::ZERO,
            counterparty_count: 0,
            item_count: 0,
        }
    }
}

/// Immutable aging report with its full provenance.
///
/// Carries the as-of date, bucket definition and rule table that produced
/// its figures, so any consumer can tell how a number was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgingReport {
    kind: ReportKind,
    currency: Option<CurrencyCode>,
    as_of_date: NaiveDate,
    bucket_definition: BucketDefinition,
    rule_table: ProvisionRuleTable,
    rollups: Vec<CounterpartyRollup>,
    grand_total: AgingTotals,
}

impl AgingReport {
    pub(crate) fn new(
        kind: ReportKind,
        currency: Option<CurrencyCode>,
        as_of_date: NaiveDate,
        bucket_definition: BucketDefinition,
        rule_table: ProvisionRuleTable,
        rollups: Vec<CounterpartyRollup>,
        grand_total: AgingTotals,
    ) -> Self {
        Self {
            kind,
            currency,
            as_of_date,
            bucket_definition,
            rule_table,
            rollups,
            grand_total,
        }
    }

    /// Receivable or payable.
    #[must_use]
    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    /// Shared currency of the items, `None` for an empty report.
    #[must_use]
    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.currency.as_ref()
    }

    /// Reference date for every item's age.
    #[must_use]
    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of_date
    }

    /// Buckets used for classification.
    #[must_use]
    pub fn bucket_definition(&self) -> &BucketDefinition {
        &self.bucket_definition
    }

    /// Rates used for provisioning.
    #[must_use]
    pub fn rule_table(&self) -> &ProvisionRuleTable {
        &self.rule_table
    }

    /// Counterparty rollups, largest debt first.
    #[must_use]
    pub fn rollups(&self) -> &[CounterpartyRollup] {
        &self.rollups
    }

    /// Rollup for one counterparty.
    #[must_use]
    pub fn rollup(&self, counterparty_id: &CounterpartyId) -> Option<&CounterpartyRollup> {
        self.rollups
            .iter()
            .find(|r| &r.counterparty_id == counterparty_id)
    }

    /// Report-wide totals.
    #[must_use]
    pub fn grand_total(&self) -> &AgingTotals {
        &self.grand_total
    }
}

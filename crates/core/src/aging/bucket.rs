//! Age buckets and the bucket classifier.
//!
//! A [`BucketDefinition`] lists the overdue buckets as half-open day
//! ranges `[min, max)`. Items that are not yet overdue (zero days or less)
//! always land in the implicit `NOT_DUE` bucket, so a definition only has
//! to cover `[1, +inf)`.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;
use super::types::LedgerItem;

/// Label of the implicit bucket for items not yet due.
pub const NOT_DUE: &str = "NOT_DUE";

/// Stable label of an age bucket (e.g. `DAYS_31_60`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketLabel(String);

impl BucketLabel {
    /// Creates a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The implicit `NOT_DUE` label.
    #[must_use]
    pub fn not_due() -> Self {
        Self(NOT_DUE.to_string())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the `NOT_DUE` label.
    #[must_use]
    pub fn is_not_due(&self) -> bool {
        self.0 == NOT_DUE
    }
}

impl std::fmt::Display for BucketLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BucketLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// One overdue bucket: `[min_days_overdue, max_days_overdue)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketBound {
    /// Bucket label.
    pub label: BucketLabel,
    /// Inclusive lower bound.
    pub min_days_overdue: i64,
    /// Exclusive upper bound, `None` for the open-ended last bucket.
    pub max_days_overdue: Option<i64>,
}

impl BucketBound {
    /// Creates a bounded bucket `[min, max)`.
    #[must_use]
    pub fn bounded(label: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            label: BucketLabel::new(label),
            min_days_overdue: min,
            max_days_overdue: Some(max),
        }
    }

    /// Creates an open-ended bucket `[min, +inf)`.
    #[must_use]
    pub fn open(label: impl Into<String>, min: i64) -> Self {
        Self {
            label: BucketLabel::new(label),
            min_days_overdue: min,
            max_days_overdue: None,
        }
    }

    /// Returns true if `days` falls inside this bucket.
    #[must_use]
    pub fn contains(&self, days: i64) -> bool {
        days >= self.min_days_overdue && self.max_days_overdue.is_none_or(|max| days < max)
    }
}

/// Validated, ordered set of overdue buckets.
///
/// Construction is the only validation gate: every value of this type is
/// contiguous, non-overlapping, starts at day 1 and is open-ended, so
/// classification is a total function. Deserialization goes through the
/// same checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BucketBound>", into = "Vec<BucketBound>")]
pub struct BucketDefinition {
    bounds: Vec<BucketBound>,
    not_due: BucketLabel,
}

impl BucketDefinition {
    /// Validates and creates a bucket definition.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` on an empty list, blank, reserved or
    /// duplicate labels, a first bucket not starting at 1, empty ranges,
    /// gaps, overlaps, or a bounded last bucket.
    pub fn new(bounds: Vec<BucketBound>) -> Result<Self, ConfigurationError> {
        validate_bounds(&bounds)?;
        Ok(Self {
            bounds,
            not_due: BucketLabel::not_due(),
        })
    }

    /// Standard 30/60/90 day buckets used by the supplier ledger.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            bounds: vec![
                BucketBound::bounded("DAYS_0_30", 1, 31),
                BucketBound::bounded("DAYS_31_60", 31, 61),
                BucketBound::bounded("DAYS_61_90", 61, 91),
                BucketBound::open("DAYS_90_PLUS", 91),
            ],
            not_due: BucketLabel::not_due(),
        }
    }

    /// Month-based buckets matching the Art. 45 six and twelve month tiers.
    #[must_use]
    pub fn art45_months() -> Self {
        Self {
            bounds: vec![
                BucketBound::bounded("MONTHS_0_6", 1, 181),
                BucketBound::bounded("MONTHS_6_12", 181, 366),
                BucketBound::open("MONTHS_12_PLUS", 366),
            ],
            not_due: BucketLabel::not_due(),
        }
    }

    /// Overdue buckets in age order.
    #[must_use]
    pub fn bounds(&self) -> &[BucketBound] {
        &self.bounds
    }

    /// Every label in report order, `NOT_DUE` first.
    pub fn labels(&self) -> impl Iterator<Item = &BucketLabel> {
        std::iter::once(&self.not_due).chain(self.bounds.iter().map(|b| &b.label))
    }

    /// Number of report columns, `NOT_DUE` included.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.bounds.len() + 1
    }

    /// Returns true if `label` is `NOT_DUE` or one of the overdue buckets.
    #[must_use]
    pub fn contains_label(&self, label: &BucketLabel) -> bool {
        self.labels().any(|l| l == label)
    }

    /// Returns the bucket for a number of days overdue.
    #[must_use]
    pub fn bucket_for_days(&self, days_overdue: i64) -> &BucketLabel {
        let slot = self.slot_for_days(days_overdue);
        self.label_at(slot)
    }

    /// Classifies a ledger item against an as-of date.
    #[must_use]
    pub fn classify(&self, item: &LedgerItem, as_of: NaiveDate) -> &BucketLabel {
        self.bucket_for_days(days_overdue(item.due_date, as_of))
    }

    /// Report column for a number of days overdue; 0 is `NOT_DUE`.
    ///
    /// Binary search over the sorted lower bounds. The first bucket starts
    /// at 1 and buckets are contiguous, so any positive day count has a
    /// bucket.
    pub(crate) fn slot_for_days(&self, days_overdue: i64) -> usize {
        if days_overdue <= 0 {
            return 0;
        }
        self.bounds
            .partition_point(|b| b.min_days_overdue <= days_overdue)
            .max(1)
    }

    pub(crate) fn label_at(&self, slot: usize) -> &BucketLabel {
        match slot {
            0 => &self.not_due,
            n => &self.bounds[n - 1].label,
        }
    }
}

impl TryFrom<Vec<BucketBound>> for BucketDefinition {
    type Error = ConfigurationError;

    fn try_from(bounds: Vec<BucketBound>) -> Result<Self, Self::Error> {
        Self::new(bounds)
    }
}

impl From<BucketDefinition> for Vec<BucketBound> {
    fn from(definition: BucketDefinition) -> Self {
        definition.bounds
    }
}

/// Whole days from `due_date` to `as_of`; positive when overdue.
#[must_use]
pub fn days_overdue(due_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (as_of - due_date).num_days()
}

/// Classifies a ledger item into an age bucket.
#[must_use]
pub fn classify<'a>(
    item: &LedgerItem,
    as_of: NaiveDate,
    definition: &'a BucketDefinition,
) -> &'a BucketLabel {
    definition.classify(item, as_of)
}

fn validate_bounds(bounds: &[BucketBound]) -> Result<(), ConfigurationError> {
    let Some(first) = bounds.first() else {
        return Err(ConfigurationError::EmptyBucketDefinition);
    };

    let mut seen = HashSet::with_capacity(bounds.len());
    for (index, bound) in bounds.iter().enumerate() {
        let label = bound.label.as_str();
        if label.trim().is_empty() {
            return Err(ConfigurationError::BlankBucketLabel { index });
        }
        if bound.label.is_not_due() {
            return Err(ConfigurationError::ReservedBucketLabel(label.to_string()));
        }
        if !seen.insert(label) {
            return Err(ConfigurationError::DuplicateBucketLabel(label.to_string()));
        }
    }

    if first.min_days_overdue != 1 {
        return Err(ConfigurationError::FirstBucketStart {
            found: first.min_days_overdue,
        });
    }

    let last_index = bounds.len() - 1;
    for (index, bound) in bounds.iter().enumerate() {
        let label = bound.label.to_string();
        match bound.max_days_overdue {
            Some(max) if index == last_index => {
                return Err(ConfigurationError::LastBucketBounded { label, max });
            }
            Some(max) if max <= bound.min_days_overdue => {
                return Err(ConfigurationError::EmptyBucketRange {
                    label,
                    min: bound.min_days_overdue,
                    max,
                });
            }
            None if index != last_index => {
                return Err(ConfigurationError::UnboundedBucketNotLast(label));
            }
            _ => {}
        }

        if let Some(next) = bounds.get(index + 1) {
            // Only the last bucket is open-ended, checked above.
            let expected = bound.max_days_overdue.unwrap_or(i64::MAX);
            let found = next.min_days_overdue;
            let label = next.label.to_string();
            if found > expected {
                return Err(ConfigurationError::BucketGap {
                    label,
                    expected,
                    found,
                });
            }
            if found < expected {
                return Err(ConfigurationError::BucketOverlap {
                    label,
                    expected,
                    found,
                });
            }
        }
    }

    Ok(())
}

//! Aging error types.

use ohada_shared::AppError;
use ohada_shared::types::{CurrencyCode, ItemId, MinorUnits};
use rust_decimal::Decimal;
use thiserror::Error;

/// Malformed engine configuration.
///
/// Raised before any ledger item is looked at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Bucket definition has no overdue buckets.
    #[error("Bucket definition must contain at least one overdue bucket")]
    EmptyBucketDefinition,

    /// Bucket label is empty.
    #[error("Bucket at position {index} has an empty label")]
    BlankBucketLabel {
        /// Position in the definition.
        index: usize,
    },

    /// Bucket label collides with the implicit `NOT_DUE` bucket.
    #[error("Bucket label {0} is reserved")]
    ReservedBucketLabel(String),

    /// Bucket label used twice.
    #[error("Duplicate bucket label: {0}")]
    DuplicateBucketLabel(String),

    /// First overdue bucket does not start at day 1.
    #[error("First bucket must start at 1 day overdue, found {found}")]
    FirstBucketStart {
        /// Lower bound found.
        found: i64,
    },

    /// Bucket upper bound is not above its lower bound.
    #[error("Bucket {label} has an empty range [{min}, {max})")]
    EmptyBucketRange {
        /// Bucket label.
        label: String,
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },

    /// Bucket starts after the previous one ends.
    #[error("Gap before bucket {label}: expected start {expected}, found {found}")]
    BucketGap {
        /// Bucket label.
        label: String,
        /// Expected lower bound (previous upper bound).
        expected: i64,
        /// Lower bound found.
        found: i64,
    },

    /// Bucket starts before the previous one ends.
    #[error("Bucket {label} overlaps its predecessor: expected start {expected}, found {found}")]
    BucketOverlap {
        /// Bucket label.
        label: String,
        /// Expected lower bound (previous upper bound).
        expected: i64,
        /// Lower bound found.
        found: i64,
    },

    /// Open-ended bucket that is not the last one.
    #[error("Only the last bucket may be open-ended, {0} is not last")]
    UnboundedBucketNotLast(String),

    /// Last bucket has an upper bound, leaving older items unclassified.
    #[error("Last bucket {label} must be open-ended, found upper bound {max}")]
    LastBucketBounded {
        /// Bucket label.
        label: String,
        /// Upper bound found.
        max: i64,
    },

    /// Provision rule with an empty bucket label.
    #[error("Provision rule has an empty bucket label")]
    BlankRuleLabel,

    /// Two provision rules for the same bucket.
    #[error("Duplicate provision rule for bucket {0}")]
    DuplicateRule(String),

    /// Provision rate outside `[0, 1]`.
    #[error("Provision rate {rate} for bucket {label} is outside [0, 1]")]
    RateOutOfRange {
        /// Bucket label.
        label: String,
        /// Rate found.
        rate: Decimal,
    },

    /// Provision rate with more fractional digits than supported.
    #[error("Provision rate {rate} for bucket {label} has more than {max_scale} decimal places")]
    RatePrecision {
        /// Bucket label.
        label: String,
        /// Rate found.
        rate: Decimal,
        /// Maximum supported scale.
        max_scale: u32,
    },

    /// Provision rule names a bucket the definition does not have.
    #[error("Provision rule references unknown bucket {0}")]
    UnknownRuleBucket(String),

    /// Unknown regulatory preset name.
    #[error("Unknown regulatory preset: {0}")]
    UnknownPreset(String),

    /// Unknown report kind.
    #[error("Unknown report kind: {0}")]
    UnknownReportKind(String),
}

/// Why a ledger item was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationReason {
    /// Counterparty id is empty.
    MissingCounterparty,
    /// Amount is below zero.
    NegativeAmount(MinorUnits),
    /// Report mixes currencies; carries this item's currency.
    MixedCurrency(CurrencyCode),
    /// Item id already used by an earlier item.
    DuplicateId,
    /// Running total exceeds the representable range at this item.
    AmountOverflow,
}

impl std::fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCounterparty => write!(f, "missing counterparty id"),
            Self::NegativeAmount(amount) => write!(f, "negative amount {amount}"),
            Self::MixedCurrency(currency) => write!(f, "mixed currency {currency}"),
            Self::DuplicateId => write!(f, "duplicate id"),
            Self::AmountOverflow => write!(f, "total amount overflow"),
        }
    }
}

/// One rejected ledger item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemViolation {
    /// Offending item.
    pub item_id: ItemId,
    /// Reason for rejection.
    pub reason: ViolationReason,
}

/// Malformed ledger input.
///
/// Lists every offending item, not only the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} invalid ledger item(s): {}", .violations.len(), format_violations(.violations))]
pub struct ValidationError {
    /// Every violation found, in input order per check.
    pub violations: Vec<ItemViolation>,
}

fn format_violations(violations: &[ItemViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} ({})", v.item_id, v.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Returns the distinct offending item ids in first-seen order.
    #[must_use]
    pub fn offending_ids(&self) -> Vec<&ItemId> {
        let mut ids: Vec<&ItemId> = Vec::with_capacity(self.violations.len());
        for violation in &self.violations {
            if !ids.contains(&&violation.item_id) {
                ids.push(&violation.item_id);
            }
        }
        ids
    }

    /// Returns true if any violation has the given reason kind.
    #[must_use]
    pub fn has(&self, predicate: impl Fn(&ViolationReason) -> bool) -> bool {
        self.violations.iter().any(|v| predicate(&v.reason))
    }
}

/// Errors returned by report construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgingError {
    /// Malformed bucket definition or rule table.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Malformed ledger items.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<AgingError> for AppError {
    fn from(err: AgingError) -> Self {
        match err {
            AgingError::Configuration(e) => Self::Configuration(e.to_string()),
            AgingError::Validation(e) => Self::Validation(e.to_string()),
        }
    }
}

impl From<ConfigurationError> for AppError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err.to_string())
    }
}

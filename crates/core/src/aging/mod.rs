//! Aged-balance and provisioning engine.
//!
//! This module turns a snapshot of outstanding ledger items into an aging
//! report:
//! - Bucket classification by days overdue
//! - Provision rule tables (SYSCOHADA presets included)
//! - Per-counterparty and report-wide rollups
//! - Report building, single date or a parallel series of dates
//!
//! Amounts are integer minor units. Provisions are the only fractional
//! values and are rounded half-up once per counterparty.

pub mod aggregate;
pub mod bucket;
pub mod error;
pub mod presets;
pub mod rules;
pub mod service;
pub mod types;
pub mod validation;


pub use aggregate::{Aggregation, Aggregator, aggregate};
pub use bucket::{BucketBound, BucketDefinition, BucketLabel, NOT_DUE, classify, days_overdue};
pub use error::{AgingError, ConfigurationError, ItemViolation, ValidationError, ViolationReason};
pub use presets::{RegulatoryPreset, resolve_settings};
pub use rules::{
    MAX_RATE_SCALE, ProvisionRule, ProvisionRuleTable, SYSCOHADA_ART45, SYSCOHADA_STANDARD,
    rate_for,
};
pub use service::{AgingReportBuilder, build, build_series};
pub use types::{
    AgedItem, AgingReport, AgingTotals, BucketTotals, CounterpartyRollup, LedgerItem, ReportKind,
};

//! Rollup of classified items per counterparty and report-wide.
//!
//! Structural invariants:
//! - `total_debt` is computed from the bucket totals, never summed apart.
//! - The grand total is summed from the rollups, never from raw items.
//! - Provisions are rounded once per counterparty, on the aggregate.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ohada_shared::types::{CounterpartyId, ItemId, MinorUnits};
use rust_decimal::Decimal;

use super::bucket::{BucketDefinition, days_overdue};
use super::error::{ItemViolation, ValidationError, ViolationReason};
use super::rules::ProvisionRuleTable;
use super::types::{AgedItem, AgingTotals, BucketTotals, CounterpartyRollup, LedgerItem};
use super::validation::validate_items;

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Rollups by descending total debt, ties by counterparty ID.
    pub rollups: Vec<CounterpartyRollup>,
    /// Sum of all rollups.
    pub grand_total: AgingTotals,
}

/// Folds ledger items into counterparty rollups for one as-of date.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    as_of: NaiveDate,
    definition: &'a BucketDefinition,
    rules: &'a ProvisionRuleTable,
    include_items: bool,
}

struct Group<'a> {
    name: &'a str,
    totals: BucketTotals,
    items: Vec<AgedItem>,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator.
    #[must_use]
    pub const fn new(
        as_of: NaiveDate,
        definition: &'a BucketDefinition,
        rules: &'a ProvisionRuleTable,
    ) -> Self {
        Self {
            as_of,
            definition,
            rules,
            include_items: false,
        }
    }

    /// Keeps the aged items of each counterparty in its rollup.
    #[must_use]
    pub const fn with_items(mut self, include_items: bool) -> Self {
        self.include_items = include_items;
        self
    }

    /// Validates then aggregates `items`.
    ///
    /// Counterparties appear only if they have at least one item. The first
    /// item seen for a counterparty supplies its display name.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` before any aggregation if an item has
    /// an empty counterparty ID or a negative amount, ids repeat,
    /// currencies differ, or the total does not fit in 64 bits.
    pub fn aggregate(&self, items: &[LedgerItem]) -> Result<Aggregation, ValidationError> {
        validate_items(items)?;
        self.fold(items)
    }

    /// Aggregates items that already passed [`validate_items`].
    ///
    /// Sums are checked; an overflow still surfaces as an
    /// `AmountOverflow` violation rather than a panic.
    pub(crate) fn fold(&self, items: &[LedgerItem]) -> Result<Aggregation, ValidationError> {
        let mut groups: BTreeMap<&CounterpartyId, Group<'_>> = BTreeMap::new();
        for item in items {
            let days = days_overdue(item.due_date, self.as_of);
            let slot = self.definition.slot_for_days(days);

            let group = groups.entry(&item.counterparty_id).or_insert_with(|| Group {
                name: &item.counterparty_name,
                totals: BucketTotals::zeroed(self.definition),
                items: Vec::new(),
            });
            group
                .totals
                .add_to_slot(slot, item.amount)
                .ok_or_else(|| overflow(&item.id))?;

            if self.include_items {
                group.items.push(AgedItem {
                    id: item.id.clone(),
                    due_date: item.due_date,
                    days_overdue: days,
                    bucket: self.definition.label_at(slot).clone(),
                    amount: item.amount,
                });
            }
        }

        let mut rollups: Vec<CounterpartyRollup> = groups
            .into_iter()
            .map(|(id, group)| self.rollup(id, group))
            .collect();
        rollups.sort_by(|a, b| {
            b.total_debt
                .cmp(&a.total_debt)
                .then_with(|| a.counterparty_id.cmp(&b.counterparty_id))
        });

        let grand_total = self
            .grand_total(&rollups, items.len())
            .ok_or_else(|| {
                items.last().map_or_else(
                    || ValidationError {
                        violations: Vec::new(),
                    },
                    |item| overflow(&item.id),
                )
            })?;
        Ok(Aggregation {
            rollups,
            grand_total,
        })
    }

    fn rollup(&self, counterparty_id: &CounterpartyId, group: Group<'_>) -> CounterpartyRollup {
        let Group {
            name,
            totals,
            mut items,
        } = group;

        let total_debt = totals.total();
        // Slot 0 is NOT_DUE.
        let not_due = totals.amounts().next().unwrap_or_default();
        let overdue_debt = total_debt - not_due;
        let provision = self.provision(&totals, total_debt);
        items.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));

        CounterpartyRollup {
            counterparty_id: counterparty_id.clone(),
            counterparty_name: name.to_string(),
            bucket_totals: totals,
            total_debt,
            overdue_debt,
            provision,
            net_debt: total_debt - provision,
            items,
        }
    }

    /// `round_half_up(sum(bucket_total * rate))`.
    ///
    /// Rates are in `[0, 1]`, so the result never exceeds `total_debt`.
    fn provision(&self, totals: &BucketTotals, total_debt: MinorUnits) -> MinorUnits {
        let exact: Decimal = totals
            .iter()
            .map(|(label, amount)| amount.to_decimal() * self.rules.rate_for(label))
            .sum();
        MinorUnits::round_half_up(exact).unwrap_or(total_debt)
    }

    fn grand_total(&self, rollups: &[CounterpartyRollup], item_count: usize) -> Option<AgingTotals> {
        let mut totals = AgingTotals::zeroed(self.definition);
        for rollup in rollups {
            totals.bucket_totals.absorb(&rollup.bucket_totals)?;
            totals.provision = totals.provision.checked_add(rollup.provision)?;
        }
        totals.total_debt = totals.bucket_totals.total();
        totals.overdue_debt = rollups.iter().map(|r| r.overdue_debt).sum();
        totals.net_debt = totals.total_debt - totals.provision;
        totals.counterparty_count = rollups.len();
        totals.item_count = item_count;
        Some(totals)
    }
}

fn overflow(item_id: &ItemId) -> ValidationError {
    ValidationError {
        violations: vec![ItemViolation {
            item_id: item_id.clone(),
            reason: ViolationReason::AmountOverflow,
        }],
    }
}

/// Validates and aggregates `items` for one as-of date without item
/// drill-down.
///
/// # Errors
///
/// Returns a `ValidationError` listing every offending item.
pub fn aggregate(
    items: &[LedgerItem],
    as_of: NaiveDate,
    definition: &BucketDefinition,
    rules: &ProvisionRuleTable,
) -> Result<Aggregation, ValidationError> {
    Aggregator::new(as_of, definition, rules).aggregate(items)
}

//! Ledger input validation.
//!
//! Every check collects all offending items before failing, so a caller
//! gets one complete error report.

use std::collections::{BTreeMap, HashSet};

use ohada_shared::types::{CurrencyCode, MinorUnits};

use super::error::{ItemViolation, ValidationError, ViolationReason};
use super::types::LedgerItem;

/// Validates a ledger snapshot and returns its shared currency.
///
/// Checks, in order: counterparty ids, non-negative amounts, unique item
/// ids, a single currency, and a total that fits in 64-bit minor units.
/// When currencies differ every item is reported with its own currency.
/// Returns `None` for an empty snapshot.
///
/// # Errors
///
/// Returns a `ValidationError` carrying every violation found.
pub fn validate_items(items: &[LedgerItem]) -> Result<Option<CurrencyCode>, ValidationError> {
    let mut violations = Vec::new();
    let mut seen_ids = HashSet::with_capacity(items.len());

    for item in items {
        if item.counterparty_id.is_blank() {
            violations.push(violation(item, ViolationReason::MissingCounterparty));
        }
        if item.amount.is_negative() {
            violations.push(violation(item, ViolationReason::NegativeAmount(item.amount)));
        }
        if !seen_ids.insert(&item.id) {
            violations.push(violation(item, ViolationReason::DuplicateId));
        }
    }

    let mut by_currency: BTreeMap<&CurrencyCode, usize> = BTreeMap::new();
    for item in items {
        *by_currency.entry(&item.currency).or_default() += 1;
    }
    if by_currency.len() > 1 {
        violations.extend(
            items
                .iter()
                .map(|item| violation(item, ViolationReason::MixedCurrency(item.currency.clone()))),
        );
    }

    let mut running = MinorUnits::ZERO;
    for item in items.iter().filter(|item| !item.amount.is_negative()) {
        if let Some(next) = running.checked_add(item.amount) {
            running = next;
        } else {
            violations.push(violation(item, ViolationReason::AmountOverflow));
            break;
        }
    }

    if violations.is_empty() {
        Ok(by_currency.into_keys().next().cloned())
    } else {
        Err(ValidationError { violations })
    }
}

fn violation(item: &LedgerItem, reason: ViolationReason) -> ItemViolation {
    ItemViolation {
        item_id: item.id.clone(),
        reason,
    }
}

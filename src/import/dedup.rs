use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

use crate::models::Transaction;

/// Deduplication key: `date|lowercased trimmed description|amount in cents`.
///
/// Ids and timestamps are not part of the key, so a re-imported row
/// matches the stored one.
pub(crate) fn fingerprint(txn: &Transaction) -> String {
    let cents = (txn.amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let cents = cents.to_i64().map_or_else(|| cents.to_string(), |c| c.to_string());
    format!(
        "{}|{}|{}",
        txn.date,
        txn.description.trim().to_lowercase(),
        cents
    )
}

/// Result of checking an incoming batch against stored transactions.
///
/// Nothing is dropped silently: the caller inspects the counts and either
/// commits [`ImportPlan::unique`] or abandons the import.
#[derive(Debug, Default)]
pub(crate) struct ImportPlan {
    pub(crate) unique: Vec<Transaction>,
    pub(crate) duplicates: Vec<Transaction>,
}

impl ImportPlan {
    /// Partition `incoming`; within the batch the first occurrence wins.
    pub(crate) fn classify(existing: &[Transaction], incoming: Vec<Transaction>) -> Self {
        let mut seen: HashSet<String> = existing.iter().map(fingerprint).collect();
        let mut plan = Self::default();
        for txn in incoming {
            if seen.insert(fingerprint(&txn)) {
                plan.unique.push(txn);
            } else {
                plan.duplicates.push(txn);
            }
        }
        plan
    }

    pub(crate) fn new_count(&self) -> usize {
        self.unique.len()
    }

    pub(crate) fn duplicate_count(&self) -> usize {
        self.duplicates.len()
    }

    pub(crate) fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

//! Recurring-bill candidates mined from transaction history.
//!
//! A group of transactions sharing a description and origin becomes a
//! suggestion when its values are consistent (coefficient of variation
//! under [`MAX_VARIATION`]) and at least half of them land on the same day
//! of the month.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use std::collections::HashMap;
use tracing::debug;

use crate::models::{RecurringTransaction, Transaction};

const MIN_OCCURRENCES: usize = 2;
/// 0.15
const MAX_VARIATION: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
const MAX_SUGGESTIONS: usize = 10;
pub(crate) const SUGGESTED_CATEGORY: &str = "Sugerida";

/// Grouping key: `description|origin`, trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GroupKey(String);

impl GroupKey {
    pub(crate) fn of(txn: &Transaction) -> Self {
        Self(format!("{}|{}", txn.description, txn.origin).trim().to_lowercase())
    }
}

/// Transactions collected under one [`GroupKey`].
#[derive(Debug, Clone)]
pub(crate) struct RecurringGroup {
    pub(crate) title: String,
    pub(crate) origin: String,
    /// Absolute values.
    pub(crate) values: Vec<Decimal>,
    pub(crate) days: Vec<u32>,
}

impl RecurringGroup {
    fn new(txn: &Transaction) -> Self {
        Self {
            title: txn.description.clone(),
            origin: txn.origin.clone(),
            values: Vec::new(),
            days: Vec::new(),
        }
    }

    fn push(&mut self, txn: &Transaction) {
        self.values.push(txn.abs_amount());
        if let Some(day) = txn.date.get(8..10).and_then(|d| d.parse().ok()) {
            self.days.push(day);
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn mean(&self) -> Decimal {
        if self.values.is_empty() {
            return Decimal::ZERO;
        }
        self.values.iter().sum::<Decimal>() / Decimal::from(self.values.len())
    }

    /// Population standard deviation over the mean, `None` for a zero mean.
    pub(crate) fn coefficient_of_variation(&self) -> Option<Decimal> {
        let mean = self.mean();
        if mean.is_zero() {
            return None;
        }
        let variance = self
            .values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<Decimal>()
            / Decimal::from(self.values.len());
        variance.sqrt()?.checked_div(mean)
    }

    /// Most frequent day of month and its frequency. Ties go to the day seen first.
    pub(crate) fn mode_day(&self) -> Option<(u32, usize)> {
        let mut counts: Vec<(u32, usize)> = Vec::new();
        for &day in &self.days {
            match counts.iter_mut().find(|(d, _)| *d == day) {
                Some((_, n)) => *n += 1,
                None => counts.push((day, 1)),
            }
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(u32, usize)>, (day, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((day, n)),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Suggestion {
    pub(crate) title: String,
    pub(crate) origin: String,
    pub(crate) average_value: Decimal,
    pub(crate) suggested_day: u32,
    pub(crate) occurrence_count: usize,
    pub(crate) consistency_pct: Decimal,
}

impl Suggestion {
    fn from_group(group: &RecurringGroup) -> Option<Self> {
        if group.count() < MIN_OCCURRENCES {
            return None;
        }
        let variation = group.coefficient_of_variation()?;
        if variation >= MAX_VARIATION {
            return None;
        }
        let (day, frequency) = group.mode_day()?;
        if frequency < group.count().div_ceil(2) {
            return None;
        }
        Some(Self {
            title: group.title.clone(),
            origin: group.origin.clone(),
            average_value: group
                .mean()
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            suggested_day: day,
            occurrence_count: group.count(),
            consistency_pct: ((Decimal::ONE - variation) * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
        })
    }

    /// Bill reminder for an accepted suggestion, always as an outflow.
    pub(crate) fn to_recurring(&self, user_id: &str) -> RecurringTransaction {
        RecurringTransaction::new(
            user_id,
            self.title.clone(),
            -self.average_value.abs(),
            self.suggested_day,
            Some(SUGGESTED_CATEGORY.to_string()),
        )
    }
}

/// Group transactions by key, preserving the order keys are first seen.
pub(crate) fn group_transactions(txns: &[Transaction]) -> Vec<RecurringGroup> {
    let mut groups: Vec<RecurringGroup> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    for txn in txns {
        let slot = *index.entry(GroupKey::of(txn)).or_insert_with(|| {
            groups.push(RecurringGroup::new(txn));
            groups.len() - 1
        });
        groups[slot].push(txn);
    }
    groups
}

/// Up to ten recurring candidates, most frequent first.
pub(crate) fn suggest_recurring(txns: &[Transaction]) -> Vec<Suggestion> {
    let groups = group_transactions(txns);
    let mut suggestions: Vec<Suggestion> =
        groups.iter().filter_map(Suggestion::from_group).collect();
    debug!(
        groups = groups.len(),
        suggestions = suggestions.len(),
        "Recurring suggestions computed"
    );
    suggestions.sort_by(|a, b| b.occurrence_count.cmp(&a.occurrence_count));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
#[path = "suggest_tests.rs"]
mod tests;

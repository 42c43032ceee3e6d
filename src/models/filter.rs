use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Transaction;

/// Narrowing for transaction listings. Every bound is optional and inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description or origin.
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Bounds on the absolute value.
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.matches_search(txn) && self.matches_date(txn) && self.matches_value(txn)
    }

    fn matches_search(&self, txn: &Transaction) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let term = term.to_lowercase();
        txn.description.to_lowercase().contains(&term) || txn.origin.to_lowercase().contains(&term)
    }

    fn matches_date(&self, txn: &Transaction) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        // a row whose date cannot be read never falls inside a range
        let Ok(date) = NaiveDate::parse_from_str(&txn.date, "%Y-%m-%d") else {
            return false;
        };
        self.date_from.map_or(true, |from| date >= from) && self.date_to.map_or(true, |to| date <= to)
    }

    fn matches_value(&self, txn: &Transaction) -> bool {
        let value = txn.abs_amount();
        self.min_value.map_or(true, |min| value >= min) && self.max_value.map_or(true, |max| value <= max)
    }
}

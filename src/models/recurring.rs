use rust_decimal::Decimal;

use crate::error::ModelError;

pub const DEFAULT_RECURRING_CATEGORY: &str = "Fixo";

/// A bill reminder. It never posts a [`Transaction`](super::Transaction) by itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringTransaction {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount: Decimal,
    pub due_day: u32,
    pub category: String,
    pub active: bool,
}

impl RecurringTransaction {
    pub fn new(
        user_id: &str,
        title: String,
        amount: Decimal,
        due_day: u32,
        category: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            amount,
            due_day,
            category: category.unwrap_or_else(|| DEFAULT_RECURRING_CATEGORY.to_string()),
            active: true,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !(1..=31).contains(&self.due_day) {
            return Err(ModelError::InvalidDueDay(self.due_day));
        }
        Ok(())
    }
}

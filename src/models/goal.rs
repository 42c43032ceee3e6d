use rust_decimal::Decimal;

use crate::error::ModelError;

pub const DEFAULT_GOAL_COLOR: &str = "#2563EB";

#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub color: String,
    pub created_at: String,
}

impl Goal {
    pub fn new(user_id: &str, title: String, target_amount: Decimal, color: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title,
            target_amount,
            current_amount: Decimal::ZERO,
            color: color.unwrap_or_else(|| DEFAULT_GOAL_COLOR.to_string()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.target_amount <= Decimal::ZERO {
            return Err(ModelError::InvalidGoalTarget(self.target_amount));
        }
        Ok(())
    }

    /// Apply a contribution; the saved amount never drops below zero.
    pub fn contribute(&mut self, delta: Decimal) {
        self.current_amount = (self.current_amount + delta).max(Decimal::ZERO);
    }

    /// Progress towards the target, 0–100, one decimal place.
    pub fn progress_pct(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let pct = self.current_amount / self.target_amount * Decimal::ONE_HUNDRED;
        pct.min(Decimal::ONE_HUNDRED).round_dp(1)
    }
}

use rust_decimal::Decimal;

use crate::error::ModelError;

/// Which sub-ledger a transaction belongs to.
///
/// Savings movements are recorded with the sign they had on the checking
/// statement: a deposit into savings leaves checking, so it arrives negative.
/// Every place that turns an amount into a ledger balance goes through
/// [`Ledger::balance_effect`] so that inversion lives in one spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ledger {
    Checking,
    CreditCard,
    Savings,
}

impl Ledger {
    pub fn of(txn: &Transaction) -> Self {
        if txn.is_savings {
            Self::Savings
        } else if txn.is_credit_card {
            Self::CreditCard
        } else {
            Self::Checking
        }
    }

    /// Contribution of a raw amount to this ledger's balance.
    pub fn balance_effect(self, amount: Decimal) -> Decimal {
        match self {
            Self::Savings => -amount,
            Self::Checking | Self::CreditCard => amount,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "Checking",
            Self::CreditCard => "Credit Card",
            Self::Savings => "Savings",
        }
    }
}

impl std::fmt::Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    /// Posting date, `YYYY-MM-DD`.
    pub date: String,
    pub description: String,
    pub origin: String,
    pub amount: Decimal,
    pub statement_date: Option<String>,
    pub document_number: Option<String>,
    pub installment_index: Option<u32>,
    pub installment_total: Option<u32>,
    pub is_credit_card: bool,
    pub is_savings: bool,
    pub created_at: String,
}

impl Transaction {
    /// A fresh checking-ledger transaction with a new id and `created_at` of now.
    pub fn new(
        user_id: &str,
        date: String,
        description: String,
        origin: String,
        amount: Decimal,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            description,
            origin,
            amount,
            statement_date: None,
            document_number: None,
            installment_index: None,
            installment_total: None,
            is_credit_card: false,
            is_savings: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn ledger(&self) -> Ledger {
        Ledger::of(self)
    }

    pub fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    /// `YYYY-MM` bucket of the posting date.
    pub fn month(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }

    /// Installments still to be billed after this one, when both fields are known.
    pub fn remaining_installments(&self) -> Option<u32> {
        match (self.installment_index, self.installment_total) {
            (Some(current), Some(total)) if total > current => Some(total - current),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.is_credit_card && self.is_savings {
            return Err(ModelError::ConflictingLedgers(self.id.clone()));
        }
        match (self.installment_index, self.installment_total) {
            (Some(index), Some(total)) if index < 1 || total < index => {
                Err(ModelError::InvalidInstallments { index, total })
            }
            _ => Ok(()),
        }
    }
}

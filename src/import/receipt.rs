use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::models::Transaction;
use crate::normalize::{normalize_amount, normalize_date, sanitize_text};

const FALLBACK_DESCRIPTION: &str = "Compra Digitalizada";
const FALLBACK_ORIGIN: &str = "OCR";

/// Build a transaction from the JSON an OCR model extracted from a receipt.
///
/// Every field is optional: a missing date becomes today, a missing value
/// becomes zero and the merchant stands in for a missing description.
pub(crate) fn receipt_to_transaction(receipt: &Value, user_id: &str) -> Transaction {
    let text = |key: &str| {
        receipt
            .get(key)
            .and_then(Value::as_str)
            .map(sanitize_text)
            .filter(|s| !s.is_empty())
    };

    let merchant = text("merchant");
    let description = text("description")
        .or_else(|| merchant.clone())
        .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string());
    let origin = merchant.unwrap_or_else(|| FALLBACK_ORIGIN.to_string());
    let date = normalize_date(receipt.get("date").and_then(Value::as_str).unwrap_or(""));

    let mut txn = Transaction::new(user_id, date, description, origin, receipt_value(receipt));
    txn.statement_date = Some(txn.date.clone());
    txn
}

/// `value` may come back as a JSON number or as formatted text.
fn receipt_value(receipt: &Value) -> Decimal {
    match receipt.get("value") {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => normalize_amount(s),
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_full_receipt() {
        let receipt = json!({
            "date": "2025-02-03",
            "value": -45.9,
            "merchant": "Padaria Pão Quente",
            "description": "Café da manhã"
        });
        let t = receipt_to_transaction(&receipt, "user-1");
        assert_eq!(t.date, "2025-02-03");
        assert_eq!(t.amount, dec!(-45.9));
        assert_eq!(t.description, "Café da manhã");
        assert_eq!(t.origin, "Padaria Pão Quente");
        assert!(!t.is_credit_card);
    }

    #[test]
    fn test_merchant_stands_in_for_description() {
        let t = receipt_to_transaction(&json!({"merchant": "Mercado", "value": "R$ 1.234,56"}), "u");
        assert_eq!(t.description, "Mercado");
        assert_eq!(t.origin, "Mercado");
        assert_eq!(t.amount, dec!(1234.56));
    }

    #[test]
    fn test_empty_receipt_uses_fallbacks() {
        let t = receipt_to_transaction(&json!({}), "u");
        assert_eq!(t.description, "Compra Digitalizada");
        assert_eq!(t.origin, "OCR");
        assert_eq!(t.amount, Decimal::ZERO);
        assert_eq!(t.date.len(), 10);
    }

    #[test]
    fn test_malformed_fields_tolerated() {
        let receipt = json!({
            "date": "amanhã",
            "value": {"total": 10},
            "merchant": 42,
            "description": "   "
        });
        let t = receipt_to_transaction(&receipt, "u");
        assert_eq!(t.description, "Compra Digitalizada");
        assert_eq!(t.origin, "OCR");
        assert_eq!(t.amount, Decimal::ZERO);
    }

    #[test]
    fn test_brazilian_date_in_receipt() {
        let t = receipt_to_transaction(&json!({"date": "03/02/2025", "value": 10}), "u");
        assert_eq!(t.date, "2025-02-03");
        assert_eq!(t.amount, dec!(10));
    }
}

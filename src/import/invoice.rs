use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::ImportError;
use crate::models::Transaction;
use crate::normalize::{normalize_amount, sanitize_text};

/// Origin given to every line of a pasted card invoice.
pub(crate) const INVOICE_ORIGIN: &str = "Fatura Cartão";

#[allow(clippy::expect_used)]
fn line_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2})/(\d{2})(?:\s+|$)").expect("invalid invoice date regex"))
}

#[allow(clippy::expect_used)]
fn value_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"-?(?:\d{1,3}(?:\.\d{3})+|\d+),\d{2}\b").expect("invalid invoice value regex")
    })
}

#[allow(clippy::expect_used)]
fn installment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)PARC\s*(\d+)/(\d+)").expect("invalid installment regex"))
}

/// Parse credit-card invoice text pasted one purchase per line, e.g.
///
/// ```text
/// 09/01 NETFLIX BR                 55,90     0,00
/// 12/01 LOJA X PARC 02/10         120,00     0,00
/// ```
///
/// The second-to-last value column is the amount in local currency. Lines
/// without a leading `DD/MM`, without two value columns, or naming a total
/// are skipped.
pub(crate) fn parse_invoice_text(
    text: &str,
    invoice_year: i32,
    user_id: &str,
) -> Result<Vec<Transaction>, ImportError> {
    if !(1900..=9999).contains(&invoice_year) {
        return Err(ImportError::InvalidInvoiceYear(invoice_year));
    }

    let transactions: Vec<Transaction> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|line| {
            let parsed = parse_invoice_line(line, invoice_year, user_id);
            if parsed.is_none() {
                debug!(line, "skipping invoice line");
            }
            parsed
        })
        .collect();

    info!(parsed = transactions.len(), invoice_year, "invoice parsed");

    if transactions.is_empty() {
        return Err(ImportError::NoValidData);
    }
    Ok(transactions)
}

fn parse_invoice_line(line: &str, year: i32, user_id: &str) -> Option<Transaction> {
    let caps = line_date_re().captures(line)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let rest = &line[caps.get(0)?.end()..];

    let values: Vec<_> = value_re().find_iter(rest).collect();
    let [.., chosen, last] = values.as_slice() else {
        return None;
    };

    let before_last = &rest[..last.start()];
    let desc_end = before_last.rfind(chosen.as_str())?;
    let description = sanitize_text(&before_last[..desc_end]);
    if description.is_empty() || description.to_uppercase().contains("TOTAL") {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let value = normalize_amount(chosen.as_str()).abs();
    // An explicit minus on the invoice is a refund or payment credited to the card.
    let amount = if chosen.as_str().starts_with('-') {
        value
    } else {
        -value
    };

    let mut txn = Transaction::new(
        user_id,
        date.format("%Y-%m-%d").to_string(),
        description,
        INVOICE_ORIGIN.to_string(),
        amount,
    );
    txn.is_credit_card = true;

    if let Some((index, total)) = installments(&txn.description) {
        txn.installment_index = Some(index);
        txn.installment_total = Some(total);
    }
    Some(txn)
}

/// `PARC 02/10` → `(2, 10)`, only when `total ≥ index ≥ 1`.
fn installments(description: &str) -> Option<(u32, u32)> {
    let caps = installment_re().captures(description)?;
    let index: u32 = caps[1].parse().ok()?;
    let total: u32 = caps[2].parse().ok()?;
    (index >= 1 && total >= index).then_some((index, total))
}

#[cfg(test)]
#[path = "invoice_tests.rs"]
mod tests;

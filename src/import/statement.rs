use rust_decimal::Decimal;
use tracing::{debug, info};

use super::detect::{detect_layout, HeaderColumns, Layout};
use crate::error::ImportError;
use crate::models::Transaction;
use crate::normalize::{
    is_date_like, normalize_amount, normalize_date, normalized_key, sanitize_text, strip_accents,
};

/// Running-balance lines the bank mixes into the statement.
const NOISE_DESCRIPTIONS: &[&str] = &["SALDO", "SALDOANTERIOR", "SALDODODIA"];

/// Upper-cased description fragments that mark a savings movement. Both
/// accented and plain spellings are listed because the source encoding of
/// bank exports is unreliable.
const SAVINGS_KEYWORDS: &[&str] = &[
    "POUPAN",
    "APL.POUP",
    "RES.POUP",
    "APLICACAO POUP",
    "APLICAÇÃO POUP",
    "RESGATE POUP",
    "TRANSFERIDO POUPAN",
    "TRANSFERIDO DA POUPAN",
    "TRANSFERENCIA DE CREDITO",
    "TRANSFERÊNCIA DE CRÉDITO",
    "TRANSFERENCIA PARA CONTA",
    "TRANSFERÊNCIA PARA CONTA",
];

/// Debit/credit marker column found in some exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nature {
    Debit,
    Credit,
}

/// One statement row after column mapping, before filtering.
#[derive(Debug, Default)]
struct RawEntry {
    date: String,
    description: String,
    origin: String,
    amount: Decimal,
    nature: Option<Nature>,
    statement_date: Option<String>,
    document_number: Option<String>,
}

/// `;` when it outnumbers `,` on the first non-blank line, `,` otherwise.
pub(crate) fn detect_delimiter(text: &str) -> u8 {
    let first = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    let semicolons = first.matches(';').count();
    let commas = first.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Split the statement into trimmed fields, honoring quoted delimiters.
pub(crate) fn split_rows(text: &str, delimiter: u8) -> Result<Vec<Vec<String>>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|f| f.trim().trim_matches('"').trim().to_string())
                .collect(),
        );
    }
    Ok(rows)
}

/// Parse decoded bank-statement text into checking or savings transactions.
///
/// Balance lines are dropped, savings movements are flagged by keyword and
/// every resulting transaction gets a fresh id. An export that yields no
/// transaction at all is reported as [`ImportError::NoValidData`].
pub(crate) fn parse_statement(
    text: &str,
    user_id: &str,
    delimiter_hint: Option<u8>,
) -> Result<Vec<Transaction>, ImportError> {
    let delimiter = delimiter_hint.unwrap_or_else(|| detect_delimiter(text));
    let rows = split_rows(text, delimiter)?;
    let layout = detect_layout(&rows).ok_or(ImportError::NoValidData)?;

    let read_row = |row: &[String]| match &layout {
        Layout::Header { columns, .. } => read_header_row(row, columns),
        Layout::Positional { .. } => read_positional_row(row),
    };

    let mut transactions = Vec::new();
    let mut skipped = 0usize;
    for (i, row) in rows.iter().enumerate().skip(layout.data_start()) {
        match read_row(row.as_slice()).and_then(|entry| into_transaction(entry, user_id)) {
            Some(txn) => transactions.push(txn),
            None => {
                debug!(row = i + 1, "skipping statement row");
                skipped += 1;
            }
        }
    }

    info!(
        parsed = transactions.len(),
        skipped,
        delimiter = %char::from(delimiter),
        "statement parsed"
    );

    if transactions.is_empty() {
        return Err(ImportError::NoValidData);
    }
    Ok(transactions)
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

fn non_empty(s: &str) -> Option<String> {
    let s = sanitize_text(s);
    (!s.is_empty()).then_some(s)
}

fn nature_marker(row: &[String]) -> Option<(usize, Nature)> {
    row.iter().enumerate().find_map(|(i, f)| match f.as_str() {
        "D" | "d" => Some((i, Nature::Debit)),
        "C" | "c" => Some((i, Nature::Credit)),
        _ => None,
    })
}

fn read_header_row(row: &[String], cols: &HeaderColumns) -> Option<RawEntry> {
    let raw_date = cell(row, Some(cols.date));
    if raw_date.is_empty() {
        return None;
    }

    let amount = if cols.value.is_some() {
        normalize_amount(cell(row, cols.value))
    } else {
        let debit = normalize_amount(cell(row, cols.debit));
        if debit.is_zero() {
            normalize_amount(cell(row, cols.credit)).abs()
        } else {
            -debit.abs()
        }
    };

    Some(RawEntry {
        date: normalize_date(raw_date),
        description: cell(row, cols.description).to_string(),
        origin: cell(row, cols.origin).to_string(),
        amount,
        nature: nature_marker(row).map(|(_, n)| n),
        statement_date: non_empty(cell(row, cols.statement_date)),
        document_number: non_empty(cell(row, cols.document_number)),
    })
}

/// A field made only of digits, separators, sign and currency markers.
fn is_amount_like(field: &str) -> bool {
    let stripped = field.replace("US$", "").replace("R$", "");
    stripped.chars().any(|c| c.is_ascii_digit())
        && stripped.chars().all(|c| {
            c.is_ascii_digit()
                || c.is_whitespace()
                || matches!(c, '.' | ',' | '-' | '+' | '(' | ')' | '$' | 'D' | 'd' | 'C' | 'c')
        })
}

fn read_positional_row(row: &[String]) -> Option<RawEntry> {
    let date_idx = row.iter().position(|f| is_date_like(f))?;
    let marker = nature_marker(row);
    let marker_idx = marker.map(|(i, _)| i);

    let mentions_balance = row.iter().any(|f| f.to_uppercase().contains("SALDO"));
    let last = row.len().saturating_sub(1);
    let (value_idx, _) = row.iter().enumerate().find(|(i, f)| {
        *i != date_idx
            && Some(*i) != marker_idx
            && !(mentions_balance && *i == last)
            && !is_date_like(f)
            && is_amount_like(f)
    })?;

    let mut texts = row.iter().enumerate().filter(|(i, f)| {
        *i != date_idx
            && *i != value_idx
            && Some(*i) != marker_idx
            && f.chars().any(char::is_alphabetic)
    });
    let description = texts.next().map(|(_, f)| f.clone()).unwrap_or_default();
    let origin = texts.next().map(|(_, f)| f.clone()).unwrap_or_default();

    Some(RawEntry {
        date: normalize_date(&row[date_idx]),
        description,
        origin,
        amount: normalize_amount(&row[value_idx]),
        nature: marker.map(|(_, n)| n),
        ..RawEntry::default()
    })
}

fn is_noise(description: &str) -> bool {
    description.trim().is_empty() || NOISE_DESCRIPTIONS.contains(&normalized_key(description).as_str())
}

pub(crate) fn is_savings_description(description: &str) -> bool {
    let upper = description.to_uppercase();
    let folded = strip_accents(&upper);
    SAVINGS_KEYWORDS
        .iter()
        .any(|kw| upper.contains(kw) || folded.contains(kw))
}

fn into_transaction(entry: RawEntry, user_id: &str) -> Option<Transaction> {
    let description = sanitize_text(&entry.description);
    if is_noise(&description) {
        return None;
    }

    let amount = match entry.nature {
        Some(Nature::Debit) if entry.amount > Decimal::ZERO => -entry.amount,
        Some(Nature::Credit) if entry.amount < Decimal::ZERO => entry.amount.abs(),
        _ => entry.amount,
    };

    let mut txn = Transaction::new(
        user_id,
        entry.date,
        description,
        sanitize_text(&entry.origin),
        amount,
    );
    txn.is_savings = is_savings_description(&txn.description);
    txn.statement_date = entry.statement_date;
    txn.document_number = entry.document_number;
    Some(txn)
}

#[cfg(test)]
#[path = "statement_tests.rs"]
mod tests;

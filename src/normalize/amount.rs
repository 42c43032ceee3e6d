use rust_decimal::Decimal;
use std::str::FromStr;

const CURRENCY_MARKERS: &[&str] = &["US$", "R$", "BRL", "USD", "$"];

/// Parse a free-form money string into a signed decimal.
///
/// Accepts Brazilian (`1.234,56`) and US (`1,234.56`) layouts, a leading or
/// trailing `-`, accounting parentheses and a trailing `D` debit marker.
/// Anything unparseable becomes zero; this never fails.
pub fn normalize_amount(raw: &str) -> Decimal {
    let mut clean: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    for marker in CURRENCY_MARKERS {
        clean = clean.replace(marker, "");
    }
    if clean.is_empty() {
        return Decimal::ZERO;
    }

    let negative = clean.starts_with('-')
        || clean.ends_with('-')
        || (clean.starts_with('(') && clean.ends_with(')'))
        || clean.ends_with(['D', 'd']);
    clean.retain(|c| !matches!(c, '(' | ')' | '-' | '+' | 'D' | 'd' | 'C' | 'c'));

    let Some(value) = Decimal::from_str(&unify_separators(&clean)).ok() else {
        return Decimal::ZERO;
    };

    if negative {
        -value.abs()
    } else {
        value.abs()
    }
}

/// Rewrite the number so `.` is the only (decimal) separator.
fn unify_separators(clean: &str) -> String {
    let last_comma = clean.rfind(',');
    let last_dot = clean.rfind('.');

    match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => clean.replace('.', "").replacen(',', ".", 1),
        (Some(_), Some(_)) => clean.replace(',', ""),
        (Some(_), None) if is_thousands_grouping(clean, ',') => clean.replace(',', ""),
        (Some(_), None) => clean.replacen(',', ".", 1),
        (None, Some(_)) if is_thousands_grouping(clean, '.') => clean.replace('.', ""),
        _ => clean.to_string(),
    }
}

/// `1,000` / `1.000.000`: a leading group of one to three digits (not starting
/// with `0`) followed only by groups of exactly three. `1234.567` and `0.567`
/// stay decimals.
fn is_thousands_grouping(clean: &str, sep: char) -> bool {
    let mut groups = clean.split(sep);
    let Some(head) = groups.next() else {
        return false;
    };
    let head_ok = (1..=3).contains(&head.len())
        && !head.starts_with('0')
        && head.chars().all(|c| c.is_ascii_digit());
    let mut tail = groups.peekable();
    head_ok
        && tail.peek().is_some()
        && tail.all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;

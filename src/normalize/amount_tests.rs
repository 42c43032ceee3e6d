#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

// ── Separator disambiguation ──────────────────────────────────

#[test]
fn test_brazilian_thousands_and_decimal() {
    assert_eq!(normalize_amount("1.234,56"), dec!(1234.56));
    assert_eq!(normalize_amount("R$ 1.234.567,89"), dec!(1234567.89));
}

#[test]
fn test_us_thousands_and_decimal() {
    assert_eq!(normalize_amount("1,234.56"), dec!(1234.56));
    assert_eq!(normalize_amount("$1,234,567.89"), dec!(1234567.89));
}

#[test]
fn test_single_comma_is_decimal() {
    assert_eq!(normalize_amount("5000,00"), dec!(5000.00));
    assert_eq!(normalize_amount("123,4"), dec!(123.4));
}

#[test]
fn test_single_separator_three_digits_is_thousands() {
    assert_eq!(normalize_amount("1,000"), dec!(1000));
    assert_eq!(normalize_amount("1.000"), dec!(1000));
    assert_eq!(normalize_amount("2.500.000"), dec!(2500000));
}

#[test]
fn test_ungrouped_three_decimals_stay_decimal() {
    assert_eq!(normalize_amount("1234.567"), dec!(1234.567));
    assert_eq!(normalize_amount("1234,567"), dec!(1234.567));
    assert_eq!(normalize_amount("0.567"), dec!(0.567));
    assert_eq!(normalize_amount("1.234,567"), dec!(1234.567));
    assert_eq!(normalize_amount("1,234.567"), dec!(1234.567));
}

#[test]
fn test_single_dot_is_decimal() {
    assert_eq!(normalize_amount("123.45"), dec!(123.45));
    assert_eq!(normalize_amount("0.5"), dec!(0.5));
}

// ── Sign markers ──────────────────────────────────────────────

#[test]
fn test_parentheses_negative() {
    assert_eq!(normalize_amount("(50,00)"), dec!(-50.00));
}

#[test]
fn test_debit_suffix_negative() {
    assert_eq!(normalize_amount("100D"), dec!(-100));
    assert_eq!(normalize_amount("1.234,56 D"), dec!(-1234.56));
}

#[test]
fn test_credit_suffix_positive() {
    assert_eq!(normalize_amount("100,00 C"), dec!(100.00));
}

#[test]
fn test_leading_and_trailing_minus() {
    assert_eq!(normalize_amount("-42,99"), dec!(-42.99));
    assert_eq!(normalize_amount("42,99-"), dec!(-42.99));
    assert_eq!(normalize_amount("R$ -1.500,00"), dec!(-1500.00));
}

#[test]
fn test_negation_does_not_double_negate() {
    assert_eq!(normalize_amount("(-50,00)"), dec!(-50.00));
    assert_eq!(normalize_amount("-100D"), dec!(-100));
}

// ── Lenient failures ──────────────────────────────────────────

#[test]
fn test_empty_is_zero() {
    assert_eq!(normalize_amount(""), Decimal::ZERO);
    assert_eq!(normalize_amount("   "), Decimal::ZERO);
    assert_eq!(normalize_amount("R$"), Decimal::ZERO);
}

#[test]
fn test_garbage_is_zero() {
    assert_eq!(normalize_amount("abc"), Decimal::ZERO);
    assert_eq!(normalize_amount("12abc34"), Decimal::ZERO);
}

#[test]
fn test_non_breaking_space_stripped() {
    assert_eq!(normalize_amount("R$\u{a0}1.000,00"), dec!(1000.00));
}

// ── Idempotency ───────────────────────────────────────────────

#[test]
fn test_idempotent_on_normalized_output() {
    for raw in [
        "1.234,56", "1,234.56", "(50,00)", "100D", "-0,01", "5000,00", "", "abc", "99.90",
        "1.234,567", "1,234.567", "-9.876,543", "0,567", "1.000", "2.500.000",
    ] {
        let once = normalize_amount(raw);
        let twice = normalize_amount(&once.to_string());
        assert_eq!(once, twice, "not idempotent for {raw:?}");
    }
}

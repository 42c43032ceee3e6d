#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

const USER: &str = "user-1";

#[test]
fn test_netflix_line() {
    let txns = parse_invoice_text("09/01 NETFLIX BR 55,90 0,00", 2025, USER).unwrap();
    assert_eq!(txns.len(), 1);
    let t = &txns[0];
    assert_eq!(t.date, "2025-01-09");
    assert_eq!(t.description, "NETFLIX BR");
    assert_eq!(t.amount, dec!(-55.90));
    assert!(t.is_credit_card);
    assert!(!t.is_savings);
    assert_eq!(t.origin, "Fatura Cartão");
    assert_eq!(t.installment_index, None);
}

#[test]
fn test_second_to_last_value_is_used() {
    let txns =
        parse_invoice_text("15/02 AMAZON US 10,00 1.234,56 0,00", 2025, USER).unwrap();
    assert_eq!(txns[0].amount, dec!(-1234.56));
    assert_eq!(txns[0].description, "AMAZON US 10,00");
}

#[test]
fn test_installments_extracted() {
    let txns =
        parse_invoice_text("12/03 MAGAZINE LOJA PARC 02/10   120,00   0,00", 2024, USER).unwrap();
    let t = &txns[0];
    assert_eq!(t.description, "MAGAZINE LOJA PARC 02/10");
    assert_eq!(t.installment_index, Some(2));
    assert_eq!(t.installment_total, Some(10));
    assert!(t.validate().is_ok());
}

#[test]
fn test_inconsistent_installments_ignored() {
    let txns = parse_invoice_text("12/03 LOJA parc 5/3 120,00 0,00", 2024, USER).unwrap();
    assert_eq!(txns[0].installment_index, None);
    assert_eq!(txns[0].installment_total, None);
}

#[test]
fn test_explicit_minus_is_credit() {
    let txns = parse_invoice_text("20/01 PAGAMENTO RECEBIDO -1.500,00 0,00", 2025, USER).unwrap();
    assert_eq!(txns[0].amount, dec!(1500.00));
}

#[test]
fn test_noise_lines_skipped() {
    let text = "\
        Fatura de janeiro\n\
        \n\
        09/01 NETFLIX BR 55,90 0,00\n\
        10/01 SUBTOTAL 55,90 0,00\n\
        11/01 Total da fatura 55,90 0,00\n\
        12/01 SEM VALOR ESTRANGEIRO 30,00\n\
        1/2 DATA CURTA 10,00 0,00\n";
    let txns = parse_invoice_text(text, 2025, USER).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].description, "NETFLIX BR");
}

#[test]
fn test_invalid_calendar_date_skipped() {
    let text = "30/02 LOJA 10,00 0,00\n01/03 LOJA 10,00 0,00\n";
    let txns = parse_invoice_text(text, 2025, USER).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].date, "2025-03-01");
}

#[test]
fn test_leap_day_follows_invoice_year() {
    assert!(parse_invoice_text("29/02 LOJA 10,00 0,00", 2024, USER).is_ok());
    assert!(matches!(
        parse_invoice_text("29/02 LOJA 10,00 0,00", 2025, USER),
        Err(ImportError::NoValidData)
    ));
}

#[test]
fn test_empty_result_is_no_valid_data() {
    assert!(matches!(
        parse_invoice_text("nothing useful here", 2025, USER),
        Err(ImportError::NoValidData)
    ));
}

#[test]
fn test_invalid_year_is_distinct_error() {
    assert!(matches!(
        parse_invoice_text("09/01 NETFLIX BR 55,90 0,00", 25, USER),
        Err(ImportError::InvalidInvoiceYear(25))
    ));
}

#[test]
fn test_installments_helper() {
    assert_eq!(installments("LOJA PARC01/12"), Some((1, 12)));
    assert_eq!(installments("LOJA Parc 12/12"), Some((12, 12)));
    assert_eq!(installments("LOJA PARC 0/12"), None);
    assert_eq!(installments("LOJA"), None);
}

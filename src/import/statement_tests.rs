#![allow(clippy::unwrap_used)]

use super::*;
use crate::import::decode_statement;
use rust_decimal_macros::dec;

const USER: &str = "user-1";

// ── Delimiter detection ───────────────────────────────────────

#[test]
fn test_detect_delimiter() {
    assert_eq!(detect_delimiter("Data;Historico;Valor"), b';');
    assert_eq!(detect_delimiter("Data,Historico,Valor"), b',');
    assert_eq!(detect_delimiter("\n\n  \nData;Valor\n1,2,3,4"), b';');
}

#[test]
fn test_detect_delimiter_tie_is_comma() {
    assert_eq!(detect_delimiter("a;b,c"), b',');
    assert_eq!(detect_delimiter(""), b',');
}

#[test]
fn test_split_rows_respects_quotes() {
    let rows = split_rows("\"2025-01-05\",\"PAGTO, LOJA\",\"10,00\"\n", b',').unwrap();
    assert_eq!(rows, vec![vec!["2025-01-05", "PAGTO, LOJA", "10,00"]]);
}

// ── Header layout ─────────────────────────────────────────────

#[test]
fn test_header_csv_drops_balance_row() {
    let text = "Data,Historico,Valor\n\
                \"2025-01-05\",\"SALARIO\",\"5000,00\"\n\
                \"2025-01-06\",\"SALDO\",\"0,00\"\n";
    let txns = parse_statement(text, USER, None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, dec!(5000.00));
    assert_eq!(txns[0].date, "2025-01-05");
    assert_eq!(txns[0].description, "SALARIO");
    assert_eq!(txns[0].user_id, USER);
    assert!(!txns[0].is_credit_card);
    assert!(!txns[0].is_savings);
}

#[test]
fn test_bank_export_semicolon_latin1() {
    let bytes: &[u8] = b"\"Data\";\"Dependencia Origem\";\"Hist\xf3rico\";\"Data do Balancete\";\"N\xfamero do documento\";\"Valor\";\n\
\"31/12/2024\";\"\";\"Saldo Anterior\";\"\";\"0\";\"1.000,00\";\n\
\"02/01/2025\";\"Ag\xeancia Centro\";\"Pix - Recebido\";\"02/01/2025\";\"123456\";\"250,00\";\n\
\"03/01/2025\";\"\";\"Aplica\xe7\xe3o Poupan\xe7a\";\"\";\"9\";\"-500,00\";\n\
\"03/01/2025\";\"\";\"S A L D O\";\"\";\"\";\"750,00\";\n";
    let text = decode_statement(bytes);
    let txns = parse_statement(&text, USER, None).unwrap();
    assert_eq!(txns.len(), 2);

    let pix = &txns[0];
    assert_eq!(pix.date, "2025-01-02");
    assert_eq!(pix.amount, dec!(250.00));
    assert_eq!(pix.origin, "Agência Centro");
    assert_eq!(pix.statement_date.as_deref(), Some("02/01/2025"));
    assert_eq!(pix.document_number.as_deref(), Some("123456"));
    assert!(!pix.is_savings);

    let deposit = &txns[1];
    assert_eq!(deposit.description, "Aplicação Poupança");
    assert_eq!(deposit.amount, dec!(-500.00));
    assert!(deposit.is_savings);
    assert_eq!(deposit.statement_date, None);
}

#[test]
fn test_debit_credit_columns() {
    let text = "Date,Description,Debit,Credit\n\
                2025-02-01,Mercado,\"45,90\",\n\
                2025-02-02,Salary,,\"3.000,00\"\n";
    let txns = parse_statement(text, USER, None).unwrap();
    assert_eq!(txns.len(), 2);
    assert_eq!(txns[0].amount, dec!(-45.90));
    assert_eq!(txns[1].amount, dec!(3000.00));
}

#[test]
fn test_header_nature_marker_corrects_sign() {
    let text = "Data;Historico;Valor;Tipo\n\
                05/01/2025;Conta de luz;180,00;D\n\
                06/01/2025;Estorno;-20,00;C\n";
    let txns = parse_statement(text, USER, None).unwrap();
    assert_eq!(txns[0].amount, dec!(-180.00));
    assert_eq!(txns[1].amount, dec!(20.00));
}

#[test]
fn test_header_row_with_blank_date_skipped() {
    let text = "Data,Historico,Valor\n\
                \"\",\"Resumo\",\"100,00\"\n\
                \"2025-01-07\",\"Padaria\",\"-12,50\"\n";
    let txns = parse_statement(text, USER, None).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].description, "Padaria");
}

#[test]
fn test_description_sanitized() {
    let text = "Data,Historico,Valor\n2025-01-07,\"Pada\u{1}ria \u{1F950}\",\"-12,50\"\n";
    let txns = parse_statement(text, USER, None).unwrap();
    assert_eq!(txns[0].description, "Padaria");
}

// ── Positional layout ─────────────────────────────────────────

#[test]
fn test_positional_with_markers_and_hint() {
    let text = "Extrato Conta Corrente\n\
                05/01/2025;PIX ENVIADO;Maria;150,00;D\n\
                06/01/2025;TED RECEBIDA;Empresa X;2.000,00;C\n\
                07/01/2025;SALDO DO DIA;;1.850,00\n";
    let txns = parse_statement(text, USER, Some(b';')).unwrap();
    assert_eq!(txns.len(), 2);

    assert_eq!(txns[0].date, "2025-01-05");
    assert_eq!(txns[0].description, "PIX ENVIADO");
    assert_eq!(txns[0].origin, "Maria");
    assert_eq!(txns[0].amount, dec!(-150.00));

    assert_eq!(txns[1].amount, dec!(2000.00));
    assert_eq!(txns[1].origin, "Empresa X");
}

#[test]
fn test_positional_balance_in_last_column_is_not_the_value() {
    let text = "Extrato\n\
                10/01/2025;Resgate Poup;300,00\n\
                11/01/2025;Saldo em conta;1.300,00\n";
    let txns = parse_statement(text, USER, Some(b';')).unwrap();
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].amount, dec!(300.00));
    assert!(txns[0].is_savings);
}

// ── Failure modes ─────────────────────────────────────────────

#[test]
fn test_empty_input_is_no_valid_data() {
    assert!(matches!(
        parse_statement("", USER, None),
        Err(ImportError::NoValidData)
    ));
}

#[test]
fn test_header_only_is_no_valid_data() {
    assert!(matches!(
        parse_statement("Data,Historico,Valor\n", USER, None),
        Err(ImportError::NoValidData)
    ));
}

#[test]
fn test_only_noise_is_no_valid_data() {
    let text = "Data;Historico;Valor\n01/01/2025;Saldo Anterior;10,00\n02/01/2025;Saldo do dia;10,00\n";
    assert!(matches!(
        parse_statement(text, USER, None),
        Err(ImportError::NoValidData)
    ));
}

#[test]
fn test_each_row_gets_fresh_id() {
    let text = "Data,Historico,Valor\n2025-01-05,A,\"1,00\"\n2025-01-05,A,\"1,00\"\n";
    let txns = parse_statement(text, USER, None).unwrap();
    assert_eq!(txns.len(), 2);
    assert_ne!(txns[0].id, txns[1].id);
}

// ── Savings keywords ──────────────────────────────────────────

#[test]
fn test_savings_keywords_both_spellings() {
    for desc in [
        "APLICAÇÃO POUPANÇA",
        "Aplicacao Poup 01",
        "RES.POUP.AUT",
        "Transferência de Crédito",
        "TRANSFERENCIA PARA CONTA 123",
        "Transferido da Poupança",
    ] {
        assert!(is_savings_description(desc), "{desc}");
    }
    assert!(!is_savings_description("PIX RECEBIDO"));
    assert!(!is_savings_description("TRANSFERENCIA ENVIADA"));
}

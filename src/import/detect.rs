use tracing::debug;

use crate::normalize::normalized_key;

/// Only the top of the file is searched for a header row.
const HEADER_SCAN_ROWS: usize = 10;

/// Column positions recovered from a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HeaderColumns {
    pub(crate) date: usize,
    pub(crate) description: Option<usize>,
    pub(crate) origin: Option<usize>,
    pub(crate) value: Option<usize>,
    pub(crate) debit: Option<usize>,
    pub(crate) credit: Option<usize>,
    pub(crate) statement_date: Option<usize>,
    pub(crate) document_number: Option<usize>,
}

/// How the rows of a statement should be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Layout {
    Header {
        columns: HeaderColumns,
        data_start: usize,
    },
    Positional {
        data_start: usize,
    },
}

impl Layout {
    /// Index of the first data row.
    pub(crate) fn data_start(&self) -> usize {
        match self {
            Self::Header { data_start, .. } | Self::Positional { data_start } => *data_start,
        }
    }
}

type Strategy = fn(&[Vec<String>]) -> Option<Layout>;

/// Tried in order; the first strategy that recognizes the rows wins.
const STRATEGIES: &[(&str, Strategy)] = &[("header", header_layout), ("positional", positional_layout)];

pub(crate) fn detect_layout(rows: &[Vec<String>]) -> Option<Layout> {
    STRATEGIES.iter().find_map(|(name, strategy)| {
        let layout = strategy(rows)?;
        debug!(strategy = *name, ?layout, "statement layout detected");
        Some(layout)
    })
}

/// A row naming a date column plus a value column or debit/credit columns.
pub(crate) fn header_layout(rows: &[Vec<String>]) -> Option<Layout> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(i, row)| {
            header_columns(row).map(|columns| Layout::Header {
                columns,
                data_start: i + 1,
            })
        })
}

/// Fallback for header-less exports: the first row is assumed to be a title.
pub(crate) fn positional_layout(rows: &[Vec<String>]) -> Option<Layout> {
    (rows.len() > 1).then_some(Layout::Positional { data_start: 1 })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    StatementDate,
    Date,
    Origin,
    Document,
    Description,
    Debit,
    Credit,
    Value,
}

/// Classify a header cell. Order matters: "Data do Balancete" is a
/// statement date, "Valor Débito" is a debit column.
fn role_of(cell: &str) -> Option<Role> {
    let key = normalized_key(cell);
    let has = |words: &[&str]| words.iter().any(|w| key.contains(w));

    if key.is_empty() {
        None
    } else if has(&["BALANCETE"]) {
        Some(Role::StatementDate)
    } else if has(&["DATA", "DATE"]) {
        Some(Role::Date)
    } else if has(&["ORIGEM", "DEPENDENCIA"]) {
        Some(Role::Origin)
    } else if has(&["DOC"]) {
        Some(Role::Document)
    } else if has(&["HIST", "DESC", "MEMO", "DETAILS"]) {
        Some(Role::Description)
    } else if has(&["DEBIT", "SAIDA"]) {
        Some(Role::Debit)
    } else if has(&["CREDIT", "ENTRADA"]) {
        Some(Role::Credit)
    } else if has(&["VALOR", "VAL", "MONTANTE", "AMOUNT"]) && !has(&["SALDO", "BALANCE"]) {
        Some(Role::Value)
    } else {
        None
    }
}

fn header_columns(row: &[String]) -> Option<HeaderColumns> {
    let mut date = None;
    let mut cols = HeaderColumns::default();

    for (idx, cell) in row.iter().enumerate() {
        let slot = match role_of(cell) {
            Some(Role::Date) => &mut date,
            Some(Role::StatementDate) => &mut cols.statement_date,
            Some(Role::Origin) => &mut cols.origin,
            Some(Role::Document) => &mut cols.document_number,
            Some(Role::Description) => &mut cols.description,
            Some(Role::Debit) => &mut cols.debit,
            Some(Role::Credit) => &mut cols.credit,
            Some(Role::Value) => &mut cols.value,
            None => continue,
        };
        // First matching column wins for each role.
        slot.get_or_insert(idx);
    }

    let has_amount = cols.value.is_some() || cols.debit.is_some() || cols.credit.is_some();
    cols.date = date?;
    has_amount.then_some(cols)
}

#[cfg(test)]
#[path = "detect_tests.rs"]
mod tests;

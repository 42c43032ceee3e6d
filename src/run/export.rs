use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::Transaction;

const HEADER: [&str; 4] = ["Data", "Histórico", "Origem", "Valor"];

pub(crate) fn write_csv<W: Write>(txns: &[Transaction], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for t in txns {
        wtr.write_record([
            t.date.as_str(),
            t.description.as_str(),
            t.origin.as_str(),
            &t.amount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(txns.len())
}

pub(crate) fn export_to_csv(path: &Path, txns: &[Transaction]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_csv(txns, file)
}

mod dedup;
mod detect;
mod encoding;
mod invoice;
mod receipt;
mod statement;

pub(crate) use dedup::ImportPlan;
pub(crate) use encoding::decode_statement;
pub(crate) use invoice::parse_invoice_text;
pub(crate) use receipt::receipt_to_transaction;
pub(crate) use statement::parse_statement;

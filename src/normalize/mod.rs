//! Lenient normalizers for the text that comes out of bank exports,
//! pasted invoices and OCR replies. None of these fail: unparseable input
//! becomes zero or today's date.

mod amount;
mod date;
mod text;

pub(crate) use amount::normalize_amount;
pub(crate) use date::{is_date_like, normalize_date};
pub(crate) use text::{normalized_key, sanitize_text, strip_accents};

use rust_decimal::Decimal;
use thiserror::Error;

/// Outcomes of parsing user-supplied files that the caller must handle
/// differently from a system failure.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no valid transactions found in the input")]
    NoValidData,
    #[error("invalid invoice year: {0}")]
    InvalidInvoiceYear(i32),
    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("transaction {0} cannot be both credit card and savings")]
    ConflictingLedgers(String),
    #[error("invalid installments {index}/{total}")]
    InvalidInstallments { index: u32, total: u32 },
    #[error("due day must be between 1 and 31, got {0}")]
    InvalidDueDay(u32),
    #[error("goal target must be positive, got {0}")]
    InvalidGoalTarget(Decimal),
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("the model returned an empty response")]
    EmptyResponse,
    #[error("could not read JSON from the model reply: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

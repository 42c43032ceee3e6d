//! Remote text-generation and receipt OCR collaborators.
//!
//! The core only needs two capabilities, so each is a trait; [`Gemini`]
//! implements both over HTTP. A call is a single attempt bounded by the
//! configured timeout.

mod gemini;
mod prompts;

pub(crate) use gemini::Gemini;
pub(crate) use prompts::{goals_prompt, insights_prompt, NO_GOALS_REPLY};

use crate::error::AiError;

pub(crate) trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

pub(crate) trait ReceiptScanner {
    /// Read a receipt image into the JSON object the receipt prompt asks for.
    async fn scan(&self, image_base64: &str, mime_type: &str) -> Result<serde_json::Value, AiError>;
}

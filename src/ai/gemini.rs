use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::prompts::{strip_code_fences, RECEIPT_PROMPT};
use super::{ReceiptScanner, TextGenerator};
use crate::config::AiConfig;
use crate::error::AiError;

/// Google Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub(crate) struct Gemini {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    text_model: String,
    vision_model: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    Image { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

impl Gemini {
    pub(crate) fn new(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config.api_key.clone().ok_or(AiError::MissingApiKey)?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            vision_model: config.vision_model.clone(),
        })
    }

    async fn generate_content(&self, model: &str, parts: Vec<Part<'_>>) -> Result<String, AiError> {
        let url = format!("{}/v1beta/models/{model}:generateContent", self.base_url);
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };
        debug!(model, "Calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, model, "Gemini request failed");
            return Err(AiError::Api { status, body });
        }

        let reply: GenerateResponse = response.json().await?;
        reply.text().ok_or(AiError::EmptyResponse)
    }
}

impl TextGenerator for Gemini {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        self.generate_content(&self.text_model, vec![Part::Text { text: prompt }])
            .await
    }
}

impl ReceiptScanner for Gemini {
    async fn scan(&self, image_base64: &str, mime_type: &str) -> Result<serde_json::Value, AiError> {
        let parts = vec![
            Part::Image {
                inline_data: InlineData {
                    mime_type,
                    data: image_base64,
                },
            },
            Part::Text {
                text: RECEIPT_PROMPT,
            },
        ];
        let reply = self.generate_content(&self.vision_model, parts).await?;
        Ok(serde_json::from_str(strip_code_fences(&reply))?)
    }
}

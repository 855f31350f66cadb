use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::ExtractionError;
use crate::page::PageDigest;

/// Something that can read an article URL and answer with a JSON object
/// carrying `title`, `imageUrl`, `date` and `source`.
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Returns the provider's raw JSON text. Parsing and fallbacks are the
    /// caller's job.
    async fn extract(&self, url: &str, page: Option<&PageDigest>) -> Result<String, ExtractionError>;
}

/// Gemini `generateContent` with a JSON response schema.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Schema the provider must answer with. `date` is the only optional field.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "imageUrl": { "type": "STRING" },
            "date": { "type": "STRING" },
            "source": { "type": "STRING" }
        },
        "required": ["title", "imageUrl", "source"]
    })
}

pub fn build_prompt(url: &str, page: Option<&PageDigest>) -> String {
    let mut prompt = format!(
        "Read the news article at this URL: {url}\n\
         Return a JSON object with:\n\
         - title: the headline, written in Bengali (বাংলা) if at all possible\n\
         - imageUrl: the absolute URL of the article's main image\n\
         - date: the publication date as shown to readers, if available\n\
         - source: the publisher name or domain\n"
    );
    if let Some(page) = page {
        prompt.push_str("\nThe page itself contains:\n");
        prompt.push_str(&page.to_prompt_context());
    }
    prompt
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl ExtractionProvider for GeminiClient {
    async fn extract(&self, url: &str, page: Option<&PageDigest>) -> Result<String, ExtractionError> {
        let api_key = self.api_key.as_deref().ok_or(ExtractionError::MissingApiKey)?;

        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": build_prompt(url, page) }]
                }
            ],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        tracing::info!(model = %self.model, url, "calling extraction provider");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let result = response.json::<GenerateContentResponse>().await?;
        let text = result.into_text().ok_or(ExtractionError::EmptyResponse)?;

        tracing::debug!(response_length = text.len(), "extraction provider answered");
        Ok(text)
    }
}

//! REST client for the Gemini `generateContent` endpoint.
//!
//! Wraps a single synchronous request/response call using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AdvisoryError;
use crate::TextGenerator;

/// Public Gemini API host.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Header carrying the credential. Kept out of the URL so it never shows up
/// in request errors.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API credential. Without one every call fails fast with
    /// [`AdvisoryError::MissingCredential`].
    pub api_key: Option<String>,
    pub model: String,
    /// Base HTTP URL, e.g. `https://generativelanguage.googleapis.com`.
    pub api_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

// ---- wire types ----

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

impl GeminiClient {
    /// Create a client with its own connection pool and request timeout.
    pub fn new(config: GeminiConfig) -> Result<Self, AdvisoryError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Pull the concatenated text of the first candidate out of a response body.
    fn extract_text(body: &str) -> Result<String, AdvisoryError> {
        let parsed: GenerateContentResponse =
            serde_json::from_str(body).map_err(|e| AdvisoryError::Malformed(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AdvisoryError::Malformed("response contained no text".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    /// Send `prompt` as a single user turn and return the generated text.
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(AdvisoryError::MissingCredential)?;

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AdvisoryError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Self::extract_text(&text)
    }
}

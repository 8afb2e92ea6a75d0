//! Gemini `generateContent` backend
//!
//! Talks to the Generative Language REST API with a single user turn per
//! prompt. The API key is sent in the `x-goog-api-key` header.
//!
//! # Example
//!
//! ```ignore
//! use novel_reader_mt::{GeminiBackend, TextBackend, TranslatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslatorConfig::from_env()?;
//!     let backend = GeminiBackend::new(&config, &config.primary_model)?;
//!     println!("{}", backend.generate("Say hello in French").await?);
//!     Ok(())
//! }
//! ```

use crate::backend::TextBackend;
use crate::config::TranslatorConfig;
use crate::error::{BackendError, ConfigError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiBackend {
    /// Create a backend for `model` using the credentials in `config`.
    pub fn new(config: &TranslatorConfig, model: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = config.credentials().ok_or(ConfigError::EmptyApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl TextBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(extract_text(parsed))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenate the text parts of the first candidate.
///
/// No candidates (e.g. a blocked prompt) yields an empty string, which the
/// client reports as an empty response rather than a backend error.
fn extract_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn map_http_error(status: StatusCode, body: &str) -> BackendError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .ok()
        .and_then(|wrapper| {
            let msg = wrapper.error.message?;
            Some(match wrapper.error.status {
                Some(status_text) if !status_text.is_empty() => format!("{status_text}: {msg}"),
                _ => msg,
            })
        })
        .unwrap_or_else(|| format!("Gemini API error ({}): {}", status, body.trim()));

    match status {
        StatusCode::TOO_MANY_REQUESTS => BackendError::Quota(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
            BackendError::Access(message)
        }
        _ => BackendError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

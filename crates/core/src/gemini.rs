//! Gemini REST client.
//!
//! Implements [`Generator`] over the Generative Language API (`models/{model}:generateContent`
//! and `models`). The API key is sent in the `x-goog-api-key` header, never in the URL, so it
//! does not end up in logs.

use crate::chat::{GenerationConfig, Generator};
use crate::config::AiProviderConfig;
use crate::{SymptomError, SymptomResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";

/// HTTP client for one configured Gemini model.
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl GeminiClient {
    /// Builds a client whose every request is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `SymptomError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AiProviderConfig, timeout: Duration) -> SymptomResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SymptomError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            model: config.model().trim_start_matches("models/").to_string(),
            api_key: config.api_key().to_string(),
            client,
            timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn map_send_error(&self, e: reqwest::Error) -> SymptomError {
        if e.is_timeout() {
            SymptomError::UpstreamUnavailable(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else if e.is_connect() {
            SymptomError::UpstreamUnavailable(format!("cannot connect to {}", self.base_url))
        } else {
            SymptomError::UpstreamUnavailable(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> SymptomResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(SymptomError::UpstreamUnavailable(format!(
            "provider returned {}: {}",
            status.as_u16(),
            body
        )))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> SymptomResult<String> {
        let url = format!("{}/models/{}:{}", self.base_url, self.model, GENERATE_METHOD);
        let body = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let parsed: GenerateResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SymptomError::UpstreamUnavailable(format!("bad response body: {e}")))?;

        Ok(parsed.text())
    }

    async fn list_models(&self) -> SymptomResult<Vec<String>> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let parsed: ModelsResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| SymptomError::UpstreamUnavailable(format!("bad response body: {e}")))?;

        Ok(parsed
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_METHOD))
            .map(|m| m.name)
            .collect())
    }
}

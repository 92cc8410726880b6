//! HTTP client for the hosted Gemini generative language API.
//!
//! This module provides the [`GeminiClient`] type which implements the
//! [`LLMClient`] trait. It lists the models advertised by the service and
//! requests single, non-streamed completions via `generateContent`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::LLMModel;
use crate::traits::{LLMCapability, LLMClient, LLMError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";
const PAGE_SIZE: &str = "1000";

pub struct GeminiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Like [`GeminiClient::new`] but with a per-request timeout.
    pub fn with_timeout(
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LLMError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            ..Self::new(base_url, api_key)
        })
    }

    fn models_url(&self) -> String {
        format!("{}/v1beta/models", self.base_url)
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            strip_prefix(model)
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelPage {
    #[serde(default)]
    models: Vec<ModelEntry>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<ModelEntry> for LLMModel {
    fn from(entry: ModelEntry) -> Self {
        let capabilities = entry
            .supported_generation_methods
            .iter()
            .filter_map(|m| match m.as_str() {
                "generateContent" => Some(LLMCapability::Generate),
                "embedContent" => Some(LLMCapability::Embed),
                "countTokens" => Some(LLMCapability::CountTokens),
                _ => None,
            })
            .collect();
        LLMModel::new(strip_prefix(&entry.name), capabilities)
    }
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, LLMError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LLMError::InvalidResponse(match block_reason {
                Some(reason) => format!("prompt blocked: {reason}"),
                None => "no candidates returned".into(),
            }));
        };
        let finish_reason = candidate.finish_reason;
        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(LLMError::InvalidResponse(format!(
                "empty candidate (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

fn strip_prefix(name: &str) -> &str {
    name.strip_prefix("models/").unwrap_or(name)
}

/// Extract the service's own diagnostic from an error body, falling back to
/// the raw text.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {detail}")
    }
}

fn is_auth_failure(status: StatusCode, body: &str) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (status == StatusCode::BAD_REQUEST && body.contains("API_KEY_INVALID"))
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn list_models(&self) -> Result<Option<Vec<LLMModel>>, LLMError> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self
                .client
                .get(self.models_url())
                .header(API_KEY_HEADER, &self.api_key)
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token.as_str())]);
            }
            let resp = req.send().await?;
            let status = resp.status();
            if matches!(status, StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED) {
                debug!(%status, "model discovery not offered by backend");
                return Ok(None);
            }
            let body = resp.text().await?;
            if is_auth_failure(status, &body) {
                return Err(LLMError::Unauthenticated(error_message(status, &body)));
            }
            if !status.is_success() {
                return Err(LLMError::Backend(error_message(status, &body)));
            }
            let page: ModelPage = serde_json::from_str(&body)
                .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;
            models.extend(page.models.into_iter().map(LLMModel::from));
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        debug!(count = models.len(), "discovered models");
        Ok(Some(models))
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LLMError> {
        let body = GenerateBody {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        };
        debug!(model, prompt_len = prompt.len(), "requesting generation");
        let resp = self
            .client
            .post(self.generate_url(model))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        let text = resp.text().await?;
        if is_auth_failure(status, &text) {
            return Err(LLMError::Unauthenticated(error_message(status, &text)));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(LLMError::ModelNotFound(model.to_string()));
        }
        if !status.is_success() {
            return Err(LLMError::Backend(error_message(status, &text)));
        }
        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| LLMError::InvalidResponse(e.to_string()))?;
        parsed.into_text()
    }
}

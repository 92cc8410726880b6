use async_trait::async_trait;
use thiserror::Error;

use crate::model::LLMModel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LLMCapability {
    /// Free-text generation from a prompt.
    Generate,
    Embed,
    CountTokens,
}

#[derive(Debug, Error)]
pub enum LLMError {
    #[error("credential rejected: {0}")]
    Unauthenticated(String),
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::Network(err.to_string())
    }
}

/// A hosted text-generation service.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Models the backend advertises, or `None` when it offers no discovery.
    async fn list_models(&self) -> Result<Option<Vec<LLMModel>>, LLMError>;

    /// Generate the full response for `prompt` on `model`.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LLMError>;
}

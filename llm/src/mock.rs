//! In-memory [`LLMClient`] used in tests and offline demos.
//!
//! Each model name is scripted with a fixed [`Outcome`]. Models without a
//! script behave as if the backend did not know them. Every `generate` call is
//! recorded so tests can assert on the order of attempts.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::model::LLMModel;
use crate::traits::{LLMClient, LLMError};

/// Scripted result of a `generate` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Text(String),
    NotFound,
    Unauthenticated(String),
    Backend(String),
}

impl Outcome {
    fn into_result(self, model: &str) -> Result<String, LLMError> {
        match self {
            Outcome::Text(text) => Ok(text),
            Outcome::NotFound => Err(LLMError::ModelNotFound(model.to_string())),
            Outcome::Unauthenticated(msg) => Err(LLMError::Unauthenticated(msg)),
            Outcome::Backend(msg) => Err(LLMError::Backend(msg)),
        }
    }
}

#[derive(Default)]
pub struct ScriptedClient {
    discovery: Option<Vec<LLMModel>>,
    discovery_error: Option<Outcome>,
    outcomes: HashMap<String, Outcome>,
    delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedClient {
    /// A client with no discovery and no known models.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertise `models` through discovery.
    pub fn with_discovery(mut self, models: Vec<LLMModel>) -> Self {
        self.discovery = Some(models);
        self
    }

    /// Make discovery itself fail with `outcome`.
    pub fn with_discovery_error(mut self, outcome: Outcome) -> Self {
        self.discovery_error = Some(outcome);
        self
    }

    pub fn with_outcome(mut self, model: impl Into<String>, outcome: Outcome) -> Self {
        self.outcomes.insert(model.into(), outcome);
        self
    }

    pub fn with_text(self, model: impl Into<String>, text: impl Into<String>) -> Self {
        self.with_outcome(model, Outcome::Text(text.into()))
    }

    /// Delay every `generate` call, to simulate a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// `(model, prompt)` pairs in the order `generate` was called.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Model names in the order `generate` was called.
    pub fn attempted_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|(model, _)| model).collect()
    }
}

#[async_trait]
impl LLMClient for ScriptedClient {
    async fn list_models(&self) -> Result<Option<Vec<LLMModel>>, LLMError> {
        if let Some(outcome) = &self.discovery_error {
            return outcome.clone().into_result("").map(|_| None);
        }
        Ok(self.discovery.clone())
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LLMError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((model.to_string(), prompt.to_string()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .get(model)
            .cloned()
            .unwrap_or(Outcome::NotFound)
            .into_result(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unscripted_models_are_not_found() {
        let client = ScriptedClient::new().with_text("a", "hello");
        assert_eq!(client.generate("a", "p").await.unwrap(), "hello");
        assert!(matches!(
            client.generate("b", "p").await,
            Err(LLMError::ModelNotFound(m)) if m == "b"
        ));
        assert_eq!(client.attempted_models(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn call_log_survives_a_panicking_reader() {
        let client = std::sync::Arc::new(ScriptedClient::new().with_text("a", "ok"));
        let poisoner = client.clone();
        let _ = std::thread::spawn(move || {
            let _held = poisoner.calls.lock().unwrap();
            panic!("poison the call log");
        })
        .join();

        assert_eq!(client.generate("a", "p").await.unwrap(), "ok");
        assert_eq!(client.attempted_models(), vec!["a"]);
    }

    #[tokio::test]
    async fn discovery_defaults_to_unsupported() {
        let client = ScriptedClient::new();
        assert!(client.list_models().await.unwrap().is_none());
    }
}

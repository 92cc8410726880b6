//! Backend model selection.
//!
//! Hosted model identifiers are renamed and retired without notice, so no
//! single identifier is hardcoded. [`ModelResolver`] first asks the backend
//! which models can generate text and picks the most preferred one. When
//! discovery is unavailable or yields nothing, it falls back to the
//! configured default and then the preference list, verifying each candidate
//! by attempting the real call.
//!
//! The probing is a small state machine over a [`CandidateQueue`]: a
//! [`SynthesisError::ModelUnavailable`] result advances to the next
//! candidate, success ends in [`Resolved`], and exhausting the queue ends in
//! [`SynthesisError::NoModelAvailable`]. Any other failure ends the walk
//! immediately.

use std::collections::VecDeque;

use llm::{LLMCapability, LLMClient, LLMError};
use tracing::{debug, info, warn};

use crate::error::SynthesisError;

/// Ordered, duplicate-free list of model identifiers still to be tried.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CandidateQueue {
    pending: VecDeque<String>,
    tried: Vec<String>,
}

impl CandidateQueue {
    pub fn new(candidates: impl IntoIterator<Item = String>) -> Self {
        let mut pending = VecDeque::new();
        for candidate in candidates {
            if !candidate.is_empty() && !pending.contains(&candidate) {
                pending.push_back(candidate);
            }
        }
        Self {
            pending,
            tried: Vec::new(),
        }
    }

    pub fn peek(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn remaining(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(String::as_str)
    }

    pub fn tried(&self) -> &[String] {
        &self.tried
    }

    /// Take the next candidate, recording it as tried.
    pub fn advance(&mut self) -> Option<String> {
        let next = self.pending.pop_front()?;
        self.tried.push(next.clone());
        Some(next)
    }

    /// Run `attempt` against each candidate in turn until one succeeds.
    pub async fn first_available<T, F, Fut>(mut self, mut attempt: F) -> Result<Resolved<T>, SynthesisError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, SynthesisError>>,
    {
        while let Some(model) = self.advance() {
            match attempt(model.clone()).await {
                Ok(value) => {
                    return Ok(Resolved {
                        model,
                        value,
                        attempts: self.tried.len(),
                    });
                }
                Err(SynthesisError::ModelUnavailable(_)) => {
                    warn!(%model, "model not found; trying next candidate");
                }
                Err(err) => return Err(err),
            }
        }
        Err(SynthesisError::NoModelAvailable { tried: self.tried })
    }
}

/// Successful end of a candidate walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved<T> {
    pub model: String,
    pub value: T,
    /// Candidates tried, including the successful one.
    pub attempts: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelResolver {
    preferences: Vec<String>,
    default_model: Option<String>,
}

impl ModelResolver {
    pub fn new(preferences: Vec<String>) -> Self {
        Self {
            preferences,
            default_model: None,
        }
    }

    /// Identifier tried first when discovery finds nothing usable.
    pub fn with_default(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    /// Generation-capable models the backend advertises, or `None` when
    /// discovery is unsupported or failed for a reason other than auth.
    async fn discover(&self, client: &dyn LLMClient) -> Result<Option<Vec<String>>, SynthesisError> {
        match client.list_models().await {
            Ok(Some(models)) => Ok(Some(
                models
                    .into_iter()
                    .filter(|m| m.supports(LLMCapability::Generate))
                    .map(|m| m.name)
                    .collect(),
            )),
            Ok(None) => {
                debug!("backend offers no model discovery");
                Ok(None)
            }
            Err(LLMError::Unauthenticated(msg)) => Err(SynthesisError::AuthenticationMissing(msg)),
            Err(err) => {
                warn!(error = %err, "model discovery failed; falling back to probing");
                Ok(None)
            }
        }
    }

    /// Order in which models should be attempted for this backend.
    pub async fn candidates(&self, client: &dyn LLMClient) -> Result<CandidateQueue, SynthesisError> {
        let discovered = self.discover(client).await?.unwrap_or_default();

        let order: Vec<String> =
            if let Some(pos) = self.preferences.iter().position(|p| discovered.contains(p)) {
                info!(model = %self.preferences[pos], "preferred model discovered");
                self.preferences[pos..].to_vec()
            } else if let Some(first) = discovered.first() {
                info!(model = %first, "no preferred model discovered; using first advertised");
                std::iter::once(first.clone())
                    .chain(self.preferences.iter().cloned())
                    .collect()
            } else {
                debug!("nothing discovered; probing default then preferences");
                self.default_model
                    .iter()
                    .cloned()
                    .chain(self.preferences.iter().cloned())
                    .collect()
            };

        let queue = CandidateQueue::new(order);
        if queue.is_empty() {
            return Err(SynthesisError::NoModelAvailable { tried: Vec::new() });
        }
        Ok(queue)
    }

    /// The model that would be attempted first.
    pub async fn resolve(&self, client: &dyn LLMClient) -> Result<String, SynthesisError> {
        let queue = self.candidates(client).await?;
        match queue.peek() {
            Some(model) => Ok(model.to_string()),
            None => Err(SynthesisError::NoModelAvailable { tried: Vec::new() }),
        }
    }
}

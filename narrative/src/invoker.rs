use std::sync::Arc;

use llm::LLMClient;
use tracing::{debug, info, warn};

use crate::error::SynthesisError;

/// One fully specified call to the generation backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Performs a single generation call and classifies its failure.
///
/// The response text is returned untouched. Content failures are never
/// retried here; only the resolver moves on to another model.
#[derive(Clone)]
pub struct SynthesisInvoker {
    client: Arc<dyn LLMClient>,
}

impl SynthesisInvoker {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &dyn LLMClient {
        self.client.as_ref()
    }

    pub async fn invoke(&self, request: GenerationRequest) -> Result<String, SynthesisError> {
        debug!(model = %request.model, prompt_len = request.prompt.len(), "invoking generation");
        match self.client.generate(&request.model, &request.prompt).await {
            Ok(text) => {
                info!(model = %request.model, chars = text.len(), "generation complete");
                Ok(text)
            }
            Err(err) => {
                let err = SynthesisError::from(err);
                warn!(model = %request.model, error = %err, "generation failed");
                Err(err)
            }
        }
    }
}

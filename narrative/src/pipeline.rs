//! The synthesis pipeline: build prompt, resolve model, invoke.

use std::sync::Arc;

use llm::LLMClient;
use tracing::{debug, info};

use crate::error::SynthesisError;
use crate::invoker::{GenerationRequest, SynthesisInvoker};
use crate::params::SynthesisParameters;
use crate::prompt::build_prompt;
use crate::resolver::ModelResolver;

/// Outcome of a successful pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesis {
    pub model: String,
    pub text: String,
    pub attempts: usize,
}

/// Stateless pipeline shared by every session.
#[derive(Clone)]
pub struct Pipeline {
    invoker: SynthesisInvoker,
    resolver: ModelResolver,
}

impl Pipeline {
    pub fn new(client: Arc<dyn LLMClient>, resolver: ModelResolver) -> Self {
        Self {
            invoker: SynthesisInvoker::new(client),
            resolver,
        }
    }

    pub async fn run(&self, params: &SynthesisParameters) -> Result<Synthesis, SynthesisError> {
        let prompt = build_prompt(params)?;
        debug!(
            document = %params.document_type,
            detail = %params.detail_level,
            notes_len = params.raw_notes.len(),
            prompt_len = prompt.len(),
            "prompt built"
        );

        let queue = self.resolver.candidates(self.invoker.client()).await?;
        let resolved = queue
            .first_available(|model| {
                let invoker = self.invoker.clone();
                let request = GenerationRequest::new(model, prompt.clone());
                async move { invoker.invoke(request).await }
            })
            .await?;

        info!(
            model = %resolved.model,
            attempts = resolved.attempts,
            "synthesis complete"
        );
        Ok(Synthesis {
            model: resolved.model,
            text: resolved.value,
            attempts: resolved.attempts,
        })
    }
}

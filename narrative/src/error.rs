use llm::LLMError;
use thiserror::Error;

/// Failures surfaced by the synthesis pipeline.
///
/// None of these mutate a session's draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("no model available (tried: {})", tried.join(", "))]
    NoModelAvailable { tried: Vec<String> },
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("authentication missing: {0}")]
    AuthenticationMissing(String),
    #[error("backend error: {0}")]
    BackendError(String),
    #[error("a synthesis is already in progress for this session")]
    Busy,
}

impl SynthesisError {
    /// Whether this failure leaves the session unable to synthesize again.
    pub fn is_fatal_for_session(&self) -> bool {
        matches!(self, SynthesisError::AuthenticationMissing(_))
    }
}

impl From<LLMError> for SynthesisError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::Unauthenticated(msg) => SynthesisError::AuthenticationMissing(msg),
            LLMError::ModelNotFound(model) => SynthesisError::ModelUnavailable(model),
            LLMError::Backend(msg) => SynthesisError::BackendError(msg),
            other => SynthesisError::BackendError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_errors_keep_diagnostic_text() {
        let err = SynthesisError::from(LLMError::Backend("429: quota exceeded".into()));
        assert_eq!(err, SynthesisError::BackendError("429: quota exceeded".into()));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn network_errors_are_backend_errors() {
        let err = SynthesisError::from(LLMError::Network("connection reset".into()));
        assert_eq!(err, SynthesisError::BackendError("network error: connection reset".into()));
    }

    #[test]
    fn no_model_lists_attempts() {
        let err = SynthesisError::NoModelAvailable {
            tried: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.to_string(), "no model available (tried: a, b)");
    }
}

//! HTTP error mapping with structured JSON bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use narrative::SynthesisError;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("session {0} not found")]
    UnknownSession(Uuid),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::UnknownSession(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ApiError::Synthesis(err) => match err {
                SynthesisError::InvalidParameters(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_PARAMETERS")
                }
                SynthesisError::Busy => (StatusCode::CONFLICT, "SYNTHESIS_IN_PROGRESS"),
                SynthesisError::AuthenticationMissing(_) => {
                    (StatusCode::UNAUTHORIZED, "AUTHENTICATION_MISSING")
                }
                SynthesisError::NoModelAvailable { .. } => {
                    (StatusCode::SERVICE_UNAVAILABLE, "NO_MODEL_AVAILABLE")
                }
                SynthesisError::ModelUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE")
                }
                SynthesisError::BackendError(_) => (StatusCode::BAD_GATEWAY, "BACKEND_ERROR"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "synthesis failed");
        } else {
            tracing::warn!(code, error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

const INTERNAL_FALLBACK_MESSAGE: &str = "Internal server error";

/// Failures of the relay endpoint. Every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Prompt is required")]
    InvalidInput,

    /// The provider rejected the request; its status is forwarded as is.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },

    #[error("No image URL returned from API")]
    MissingResult,

    #[error("{0}")]
    Internal(String),
}

impl GenerateError {
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            GenerateError::Internal(INTERNAL_FALLBACK_MESSAGE.to_string())
        } else {
            GenerateError::Internal(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::InvalidInput => StatusCode::BAD_REQUEST,
            GenerateError::Upstream { status, .. } => *status,
            GenerateError::MissingResult | GenerateError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Metric label for this failure.
    pub fn outcome(&self) -> &'static str {
        match self {
            GenerateError::InvalidInput => "invalid_input",
            GenerateError::Upstream { .. } => "upstream_error",
            GenerateError::MissingResult => "missing_result",
            GenerateError::Internal(_) => "internal_error",
        }
    }
}

impl From<ProviderError> for GenerateError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, message } => {
                GenerateError::Upstream { status, message }
            }
            ProviderError::MissingImageUrl => GenerateError::MissingResult,
            ProviderError::Network(message) | ProviderError::InvalidResponse(message) => {
                GenerateError::internal(message)
            }
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

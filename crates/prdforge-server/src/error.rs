// ABOUTME: API error type and its JSON response mapping.
// ABOUTME: Upstream (LLM or source) failures map to 502, missing configuration to 503.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use prdforge_agent::AgentError;

use crate::api::generated_at;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Agent(AgentError::NotConfigured(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Agent(e) if e.is_upstream() => StatusCode::BAD_GATEWAY,
            ApiError::Agent(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::warn!(status = status.as_u16(), error = %self, "request failed");
        (
            status,
            Json(serde_json::json!({
                "status": "error",
                "error": self.to_string(),
                "generated_at": generated_at(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prdforge_agent::LlmError;

    #[test]
    fn status_codes_by_cause() {
        assert_eq!(
            ApiError::BadRequest("days".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(AgentError::NotConfigured("GitHub")).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(AgentError::Llm(LlmError::RateLimited)).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }
}

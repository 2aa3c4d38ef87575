// ABOUTME: Provider module aggregating all LLM runtime adapters.
// ABOUTME: Each sub-module implements LlmRuntime for a specific text-generation API.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::runtime::LlmError;

pub use anthropic::AnthropicRuntime;
pub use gemini::GeminiRuntime;
pub use openai::OpenAiRuntime;

/// Upper bound on a single completion call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default HTTP client");
            Client::new()
        })
}

/// Map the provider's HTTP status to an LlmError and decode the JSON body.
/// `key_var` names the credential to check on 401/403.
pub(crate) async fn read_json(response: Response, key_var: &str) -> Result<Value, LlmError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmError::RateLimited);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(LlmError::ProviderError(format!(
            "Unauthorized: check {}",
            key_var
        )));
    }

    if status.is_server_error() {
        return Err(LlmError::ProviderError(format!("Server error: {}", status)));
    }

    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(LlmError::ProviderError(format!(
            "API error {}: {}",
            status, error_body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(format!("failed to parse JSON: {}", e)))
}

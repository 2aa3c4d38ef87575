// ABOUTME: Google Gemini API adapter implementing the LlmRuntime trait.
// ABOUTME: Translates a CompletionRequest into a generateContent call and joins the text parts of the answer.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::providers::{http_client, read_json};
use crate::runtime::{CompletionRequest, LlmError, LlmRuntime};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const MAX_TOKENS: u32 = 4096;

/// Google Gemini runtime adapter.
pub struct GeminiRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiRuntime {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the Gemini generateContent API.
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        json!({
            "system_instruction": {
                "parts": [{"text": request.system}]
            },
            "contents": [{
                "role": "user",
                "parts": [{"text": request.prompt}]
            }],
            "generation_config": {
                "temperature": request.temperature,
                "max_output_tokens": MAX_TOKENS
            }
        })
    }

    /// Extract the answer text from a generateContent response.
    pub fn parse_response(response_body: &Value) -> Result<String, LlmError> {
        let candidate = response_body
            .get("candidates")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing candidates array in response".to_string())
            })?
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("empty candidates array".to_string()))?;

        let parts = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing parts array in content".to_string())
            })?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            let reason = candidate
                .get("finishReason")
                .and_then(|f| f.as_str())
                .unwrap_or("unknown");
            return Err(LlmError::InvalidResponse(format!(
                "no text in response (finish reason: {})",
                reason
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl LlmRuntime for GeminiRuntime {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = self.build_request_body(request);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let response_body = read_json(response, "GEMINI_API_KEY").await?;
        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

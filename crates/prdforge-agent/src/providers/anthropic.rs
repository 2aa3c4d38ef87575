// ABOUTME: Anthropic Messages API adapter implementing the LlmRuntime trait.
// ABOUTME: Sends the role framing as the system prompt and joins the text blocks of the reply.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::providers::{http_client, read_json};
use crate::runtime::{CompletionRequest, LlmError, LlmRuntime};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

pub struct AnthropicRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicRuntime {
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: http_client(),
            api_key,
            base_url,
            model,
        }
    }

    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": request.temperature,
            "system": request.system,
            "messages": [{"role": "user", "content": request.prompt}]
        })
    }

    pub fn parse_response(response_body: &Value) -> Result<String, LlmError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing content array in response".to_string())
            })?;

        let text: String = content
            .iter()
            .filter(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|block| block.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::InvalidResponse(
                "no text blocks in response".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmRuntime for AnthropicRuntime {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = self.build_request_body(request);
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let response_body = read_json(response, "ANTHROPIC_API_KEY").await?;
        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

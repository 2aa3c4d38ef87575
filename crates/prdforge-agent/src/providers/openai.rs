// ABOUTME: OpenAI Chat Completions adapter implementing the LlmRuntime trait.

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::providers::{http_client, read_json};
use crate::runtime::{CompletionRequest, LlmError, LlmRuntime};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 4096;

pub struct OpenAiRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiRuntime {
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
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.prompt}
            ]
        })
    }

    pub fn parse_response(response_body: &Value) -> Result<String, LlmError> {
        let message = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| {
                LlmError::InvalidResponse("missing choices[0].message in response".to_string())
            })?;

        match message.get("content").and_then(|c| c.as_str()) {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(LlmError::InvalidResponse(
                "message has no text content".to_string(),
            )),
        }
    }
}

#[async_trait]
impl LlmRuntime for OpenAiRuntime {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = self.build_request_body(request);
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ProviderError(format!("HTTP request failed: {}", e)))?;

        let response_body = read_json(response, "OPENAI_API_KEY").await?;
        Self::parse_response(&response_body)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

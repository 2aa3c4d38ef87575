// ABOUTME: Defines the LlmRuntime trait every text-generation provider implements.
// ABOUTME: Also defines CompletionRequest (what agents send) and LlmError (what can go wrong).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One prompt for a hosted text-generation model: a role-framing system
/// prompt, the user prompt, and a sampling temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Errors that can occur while calling an LLM provider.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,
}

/// Trait that all LLM provider adapters implement. Each provider
/// (Gemini, OpenAI, Anthropic) translates a CompletionRequest into its
/// API call and returns the model's free-text answer.
#[async_trait]
pub trait LlmRuntime: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Provider name for logging and display (e.g. "gemini", "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier being used (e.g. "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}

// ABOUTME: Factory for creating the configured LLM runtime from LlmSettings.
// ABOUTME: Resolves provider + optional model and base URL into an Arc<dyn LlmRuntime>.

use std::sync::Arc;

use prdforge_core::config::{LlmProvider, LlmSettings};

use crate::providers::{AnthropicRuntime, GeminiRuntime, OpenAiRuntime, anthropic, gemini, openai};
use crate::runtime::LlmRuntime;

/// Create the LLM runtime described by `settings`.
///
/// The model is the explicit `PRDFORGE_LLM_MODEL` override if present,
/// otherwise the provider's default. Fails when the provider's API key is
/// missing.
pub fn create_runtime(settings: &LlmSettings) -> Result<Arc<dyn LlmRuntime>, anyhow::Error> {
    let key_var = match settings.provider {
        LlmProvider::Gemini => "GEMINI_API_KEY (or GOOGLE_API_KEY)",
        LlmProvider::OpenAi => "OPENAI_API_KEY",
        LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
    };
    let api_key = settings
        .api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("{} environment variable not set", key_var))?;

    let runtime: Arc<dyn LlmRuntime> = match settings.provider {
        LlmProvider::Gemini => Arc::new(GeminiRuntime::new(
            api_key,
            resolve(&settings.base_url, gemini::DEFAULT_BASE_URL),
            resolve(&settings.model, gemini::DEFAULT_MODEL),
        )),
        LlmProvider::OpenAi => Arc::new(OpenAiRuntime::new(
            api_key,
            resolve(&settings.base_url, openai::DEFAULT_BASE_URL),
            resolve(&settings.model, openai::DEFAULT_MODEL),
        )),
        LlmProvider::Anthropic => Arc::new(AnthropicRuntime::new(
            api_key,
            resolve(&settings.base_url, anthropic::DEFAULT_BASE_URL),
            resolve(&settings.model, anthropic::DEFAULT_MODEL),
        )),
    };

    tracing::info!(
        provider = runtime.provider_name(),
        model = runtime.model_name(),
        "LLM runtime ready"
    );
    Ok(runtime)
}

fn resolve(value: &Option<String>, default: &str) -> String {
    value.clone().unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: LlmProvider, key: Option<&str>, model: Option<&str>) -> LlmSettings {
        LlmSettings {
            provider,
            model: model.map(String::from),
            api_key: key.map(String::from),
            base_url: None,
        }
    }

    /// Extract the error string without requiring Debug on the runtime.
    fn expect_err(result: Result<Arc<dyn LlmRuntime>, anyhow::Error>) -> String {
        match result {
            Err(e) => e.to_string(),
            Ok(runtime) => panic!("expected error, got {}", runtime.provider_name()),
        }
    }

    #[test]
    fn missing_key_names_the_variable() {
        let err = expect_err(create_runtime(&settings(LlmProvider::Gemini, None, None)));
        assert!(err.contains("GEMINI_API_KEY"), "{}", err);
        let err = expect_err(create_runtime(&settings(LlmProvider::Anthropic, None, None)));
        assert!(err.contains("ANTHROPIC_API_KEY"), "{}", err);
    }

    #[test]
    fn defaults_per_provider() {
        let cases = [
            (LlmProvider::Gemini, "gemini", "gemini-2.0-flash"),
            (LlmProvider::OpenAi, "openai", "gpt-4o"),
            (LlmProvider::Anthropic, "anthropic", "claude-sonnet-4-5-20250929"),
        ];
        for (provider, name, model) in cases {
            let runtime = create_runtime(&settings(provider, Some("k"), None)).unwrap();
            assert_eq!(runtime.provider_name(), name);
            assert_eq!(runtime.model_name(), model);
        }
    }

    #[test]
    fn model_override_wins() {
        let runtime =
            create_runtime(&settings(LlmProvider::OpenAi, Some("k"), Some("gpt-4o-mini"))).unwrap();
        assert_eq!(runtime.model_name(), "gpt-4o-mini");
    }
}

// ABOUTME: Error type for agent and orchestrator operations.
// ABOUTME: Wraps LLM, source, render and state-machine errors so callers match on one enum.

use prdforge_core::render::RenderError;
use prdforge_core::workflow::TransitionError;
use prdforge_sources::SourceError;

use crate::runtime::LlmError;

/// Errors that can occur while an agent or the orchestrator runs.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// The operation needs a source that has no credentials.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("all data sources failed: {0}")]
    AllSourcesFailed(String),
}

impl AgentError {
    /// Whether the error came from a remote service rather than local logic.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AgentError::Llm(_) | AgentError::Source(_) | AgentError::AllSourcesFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: AgentError = LlmError::RateLimited.into();
        assert_eq!(err.to_string(), "Rate limited");
        assert!(err.is_upstream());

        let err: AgentError = SourceError::Unauthorized("GITHUB_TOKEN").into();
        assert_eq!(err.to_string(), "Unauthorized: check GITHUB_TOKEN");
    }

    #[test]
    fn not_configured_is_local() {
        let err = AgentError::NotConfigured("GitHub");
        assert_eq!(err.to_string(), "GitHub is not configured");
        assert!(!err.is_upstream());
    }
}

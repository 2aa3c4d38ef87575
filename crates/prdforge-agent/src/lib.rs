// ABOUTME: Agent system for prdforge: LLM runtimes, role prompts, the three agents and the orchestrator.
// ABOUTME: The orchestrator sequences fetch, analysis and PRD generation into one workflow run.

pub mod analysis;
pub mod client;
pub mod error;
pub mod orchestrator;
pub mod prd;
pub mod prompt;
pub mod providers;
pub mod reporter;
pub mod roles;
pub mod runtime;
pub mod summary;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analysis::{AnalysisAgent, AnalysisReport};
pub use client::create_runtime;
pub use error::AgentError;
pub use orchestrator::{
    GatheredData, Orchestrator, ProductAnalysis, SourceFailure, WorkflowRequest,
};
pub use prd::PrdAgent;
pub use prompt::RoleAnalysis;
pub use reporter::{GitHubReport, GitHubReporter};
pub use roles::AgentRole;
pub use runtime::{CompletionRequest, LlmError, LlmRuntime};
pub use summary::OutputFormatter;

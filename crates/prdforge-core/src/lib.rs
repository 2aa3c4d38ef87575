// ABOUTME: Core library for prdforge: data model, LLM response parsing, rendering, config and output files.
// ABOUTME: This crate has no network code; fetchers and agents build on the types defined here.

pub mod activity;
pub mod config;
pub mod format;
pub mod gherkin;
pub mod model;
pub mod output;
pub mod parse;
pub mod render;
pub mod workflow;

pub use activity::{CommitSummary, GitHubSnapshot, IssueSummary, PullRequestSummary, RepositoryStats};
pub use config::{ConfigError, LlmProvider, Settings};
pub use gherkin::{GherkinFeature, GherkinScenario};
pub use model::{AnalysisResult, GeneratedDocs, PrdDocument, ProductBrief, RawSourceData};
pub use output::OutputError;
pub use render::RenderError;
pub use workflow::{WorkflowIssue, WorkflowReport, WorkflowStage, WorkflowStatus};

// ABOUTME: The analysis agent: three role-framed analysts followed by a synthesizer.
// ABOUTME: The synthesizer's answer is parsed into an AnalysisResult.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prdforge_core::model::{AnalysisResult, RawSourceData};
use prdforge_core::parse::parse_analysis;

use crate::error::AgentError;
use crate::prompt::{self, RoleAnalysis};
use crate::roles::ANALYSTS;
use crate::runtime::LlmRuntime;

/// Output of one analysis run: each analyst's answer, the raw synthesis
/// and the structured result parsed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sources: Vec<String>,
    pub role_analyses: Vec<RoleAnalysis>,
    pub synthesis: String,
    pub analysis: AnalysisResult,
    pub generated_at: DateTime<Utc>,
}

pub struct AnalysisAgent {
    runtime: Arc<dyn LlmRuntime>,
}

impl AnalysisAgent {
    pub fn new(runtime: Arc<dyn LlmRuntime>) -> Self {
        Self { runtime }
    }

    /// Run the analysts one after another, then synthesize. Any LLM error
    /// aborts the run.
    pub async fn analyze(&self, data: &RawSourceData) -> Result<AnalysisReport, AgentError> {
        let sources = data.source_names();
        let mut role_analyses = Vec::with_capacity(ANALYSTS.len());

        for role in ANALYSTS {
            tracing::info!(role = %role, "running analyst");
            let analysis = self.runtime.complete(&prompt::analyst(role, data)).await?;
            tracing::debug!(role = %role, chars = analysis.len(), "analyst finished");
            role_analyses.push(RoleAnalysis { role, analysis });
        }

        tracing::info!("synthesizing analyses");
        let synthesis = self
            .runtime
            .complete(&prompt::synthesis(&role_analyses, data))
            .await?;

        let analysis = parse_analysis(&synthesis);
        if analysis.is_empty() {
            tracing::warn!("synthesis contained no recognizable sections");
        }
        tracing::info!(
            goals = analysis.goals.len(),
            constraints = analysis.constraints.len(),
            edge_cases = analysis.edge_cases.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            sources,
            role_analyses,
            synthesis,
            analysis,
            generated_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::AgentRole;
    use crate::testing::{ANALYST_ANSWER, StubRuntime};

    #[tokio::test]
    async fn analysts_then_synthesizer() {
        let runtime = Arc::new(StubRuntime::scripted());
        let agent = AnalysisAgent::new(runtime.clone());

        let report = agent.analyze(&RawSourceData::sample()).await.unwrap();

        let order: Vec<String> = runtime.requests().iter().map(|r| r.system.clone()).collect();
        assert_eq!(
            order,
            vec![
                AgentRole::ProductAnalyst.system_prompt(),
                AgentRole::TechnicalAnalyst.system_prompt(),
                AgentRole::BusinessAnalyst.system_prompt(),
                AgentRole::Synthesizer.system_prompt(),
            ]
        );
        assert_eq!(report.role_analyses.len(), 3);
        assert_eq!(report.role_analyses[0].analysis, ANALYST_ANSWER);
        assert_eq!(report.sources, vec!["sample".to_string()]);
        assert_eq!(
            report.analysis.goals,
            vec![
                "Reduce time to triage incoming requests",
                "Increase weekly active users"
            ]
        );
        assert_eq!(report.analysis.edge_cases, vec!["Empty inbox"]);
    }

    #[tokio::test]
    async fn synthesis_prompt_carries_every_analyst() {
        let runtime = Arc::new(
            StubRuntime::scripted()
                .answer_role(AgentRole::TechnicalAnalyst, "Needs a queue."),
        );
        AnalysisAgent::new(runtime.clone())
            .analyze(&RawSourceData::sample())
            .await
            .unwrap();

        let synthesis = runtime
            .requests()
            .into_iter()
            .find(|r| r.system == AgentRole::Synthesizer.system_prompt())
            .unwrap();
        assert!(synthesis.prompt.contains("**Technical Analyst:**\nNeeds a queue."));
        assert!(synthesis.prompt.contains("**Business Analyst:**"));
    }

    #[tokio::test]
    async fn unstructured_synthesis_gives_empty_result() {
        let runtime = Arc::new(StubRuntime::new("Nothing structured here."));
        let report = AnalysisAgent::new(runtime)
            .analyze(&RawSourceData::sample())
            .await
            .unwrap();
        assert!(report.analysis.is_empty());
    }

    #[tokio::test]
    async fn analyst_failure_stops_the_run() {
        let runtime = Arc::new(StubRuntime::scripted().fail_role(AgentRole::BusinessAnalyst));
        let err = AnalysisAgent::new(runtime.clone())
            .analyze(&RawSourceData::sample())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
        assert_eq!(runtime.calls_for(AgentRole::Synthesizer), 0);
    }
}

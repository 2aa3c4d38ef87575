// ABOUTME: The PRD agent: asks the PRD writer for a document and the QA engineer for Gherkin scenarios.
// ABOUTME: Parsed answers are rendered into PRD markdown and `.feature` text.

use std::sync::Arc;

use chrono::Local;
use serde_json::Value;

use prdforge_core::gherkin::{GherkinFeature, fallback_features, parse_gherkin, render_gherkin};
use prdforge_core::model::{AnalysisResult, GeneratedDocs, PrdDocument};
use prdforge_core::parse::parse_prd;
use prdforge_core::render::render_prd;

use crate::error::AgentError;
use crate::prompt;
use crate::runtime::LlmRuntime;

pub struct PrdAgent {
    runtime: Arc<dyn LlmRuntime>,
}

impl PrdAgent {
    pub fn new(runtime: Arc<dyn LlmRuntime>) -> Self {
        Self { runtime }
    }

    /// Ask for a PRD and parse it. Sections the answer lacks are filled
    /// from the analysis or fixed defaults.
    pub async fn generate_prd(
        &self,
        analysis: &AnalysisResult,
        context: Option<&Value>,
    ) -> Result<PrdDocument, AgentError> {
        tracing::info!(with_context = context.is_some(), "generating PRD");
        let answer = self.runtime.complete(&prompt::prd(analysis, context)).await?;
        Ok(parse_prd(&answer, analysis, Local::now()))
    }

    /// Ask for Gherkin scenarios covering `prd`. When the answer holds no
    /// usable feature, features derived from `analysis` are returned.
    pub async fn generate_gherkin(
        &self,
        prd: &PrdDocument,
        analysis: &AnalysisResult,
    ) -> Result<Vec<GherkinFeature>, AgentError> {
        tracing::info!(title = %prd.title, "generating Gherkin scenarios");
        let answer = self.runtime.complete(&prompt::gherkin(prd)).await?;
        let features = parse_gherkin(&answer);
        if features.is_empty() {
            tracing::warn!("no Gherkin features in answer, deriving from analysis");
            return Ok(fallback_features(analysis));
        }
        Ok(features)
    }

    /// PRD plus Gherkin, both rendered.
    pub async fn generate_documentation(
        &self,
        analysis: &AnalysisResult,
        context: Option<&Value>,
    ) -> Result<GeneratedDocs, AgentError> {
        let prd_document = self.generate_prd(analysis, context).await?;
        let features = self.generate_gherkin(&prd_document, analysis).await?;

        let prd = render_prd(&prd_document)?;
        let gherkin = render_gherkin(&features);
        tracing::info!(
            prd_bytes = prd.len(),
            features = features.len(),
            "documentation generated"
        );

        Ok(GeneratedDocs {
            prd,
            gherkin,
            prd_document,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::AgentRole;
    use crate::testing::{PRD_ANSWER, StubRuntime};
    use serde_json::json;

    fn analysis() -> AnalysisResult {
        AnalysisResult {
            goals: vec!["Faster triage".into()],
            constraints: vec!["Existing infrastructure".into()],
            edge_cases: vec!["Empty inbox".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn prd_is_parsed_with_analysis_constraints() {
        let runtime = Arc::new(StubRuntime::scripted());
        let prd = PrdAgent::new(runtime)
            .generate_prd(&analysis(), None)
            .await
            .unwrap();
        assert_eq!(prd.title, "Smart Triage");
        assert_eq!(prd.objectives, vec!["Cut first response time in half"]);
        assert_eq!(prd.constraints, vec!["Existing infrastructure"]);
        assert!(!prd.generated_on.is_empty());
    }

    #[tokio::test]
    async fn context_reaches_the_prompt() {
        let runtime = Arc::new(StubRuntime::scripted());
        PrdAgent::new(runtime.clone())
            .generate_prd(&analysis(), Some(&json!({"product_name": "Triage"})))
            .await
            .unwrap();
        assert!(runtime.requests()[0].prompt.contains("\"product_name\": \"Triage\""));
    }

    #[tokio::test]
    async fn empty_gherkin_answer_falls_back_to_analysis() {
        let runtime = Arc::new(
            StubRuntime::new("no scenarios")
                .answer_role(AgentRole::PrdWriter, PRD_ANSWER),
        );
        let docs = PrdAgent::new(runtime)
            .generate_documentation(&analysis(), None)
            .await
            .unwrap();
        assert_eq!(docs.features, fallback_features(&analysis()));
        assert!(docs.gherkin.contains("Feature: Goal Achievement"));
    }

    #[tokio::test]
    async fn documentation_renders_both_artifacts() {
        let runtime = Arc::new(StubRuntime::scripted());
        let docs = PrdAgent::new(runtime.clone())
            .generate_documentation(&analysis(), None)
            .await
            .unwrap();
        assert!(docs.prd.contains("Smart Triage"));
        assert_eq!(docs.features.len(), 1);
        assert!(docs.gherkin.contains("Feature: Request grouping"));
        assert!(docs.gherkin.contains("Given an inbox with mixed requests"));
        assert_eq!(runtime.call_count(), 2);
    }

    #[tokio::test]
    async fn gherkin_failure_is_an_error() {
        let runtime = Arc::new(StubRuntime::scripted().fail_role(AgentRole::QaEngineer));
        let err = PrdAgent::new(runtime)
            .generate_documentation(&analysis(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }
}

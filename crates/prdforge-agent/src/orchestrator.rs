// ABOUTME: Sequences fetch, analysis and document generation across the three agents.
// ABOUTME: Drives a WorkflowReport through its stages and exposes the standalone operations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use prdforge_core::activity::GitHubSnapshot;
use prdforge_core::config::Settings;
use prdforge_core::model::{AnalysisResult, GeneratedDocs, ProductBrief, RawSourceData};
use prdforge_core::workflow::{WorkflowReport, WorkflowStage};
use prdforge_sources::{ActivitySource, SourceFetcher, configured_fetchers};

use crate::analysis::{AnalysisAgent, AnalysisReport};
use crate::client::create_runtime;
use crate::error::AgentError;
use crate::prd::PrdAgent;
use crate::reporter::{GitHubReport, GitHubReporter};
use crate::runtime::LlmRuntime;

/// Window fetched for a standalone product analysis.
pub const DEFAULT_ANALYSIS_DAYS: u32 = 30;

/// Key under which the product brief is stored in the gathered data.
pub const BRIEF_SOURCE: &str = "user_input";

/// A source that failed during fetching, kept so the run can report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct GatheredData {
    pub data: RawSourceData,
    pub failures: Vec<SourceFailure>,
    /// True when built-in sample data stands in for real sources.
    pub used_sample: bool,
}

impl GatheredData {
    /// PRD writer context carrying the brief exactly as it was recorded
    /// under `user_input`, or `None` without a brief.
    pub fn prd_context(&self) -> Option<Value> {
        self.data
            .get(BRIEF_SOURCE)
            .map(|brief| json!({ "user_requirements": brief }))
    }
}

/// Result of a standalone product analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub report: AnalysisReport,
    pub failures: Vec<SourceFailure>,
    /// See [`GatheredData::prd_context`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prd_context: Option<Value>,
}

/// Inputs of one complete workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub days_back: u32,
    pub brief: Option<ProductBrief>,
}

impl Default for WorkflowRequest {
    fn default() -> Self {
        Self {
            days_back: 1,
            brief: None,
        }
    }
}

pub struct Orchestrator {
    runtime: Arc<dyn LlmRuntime>,
    fetchers: Vec<Box<dyn SourceFetcher>>,
    reporter: GitHubReporter,
    analysis: AnalysisAgent,
    prd: PrdAgent,
}

impl Orchestrator {
    pub fn new(
        runtime: Arc<dyn LlmRuntime>,
        fetchers: Vec<Box<dyn SourceFetcher>>,
        activity: Option<Arc<dyn ActivitySource>>,
    ) -> Self {
        Self {
            reporter: GitHubReporter::new(Arc::clone(&runtime), activity),
            analysis: AnalysisAgent::new(Arc::clone(&runtime)),
            prd: PrdAgent::new(Arc::clone(&runtime)),
            runtime,
            fetchers,
        }
    }

    /// Build the runtime and every source `settings` has credentials for.
    pub fn from_settings(settings: &Settings) -> Result<Self, anyhow::Error> {
        let runtime = create_runtime(&settings.llm)?;
        let sources = configured_fetchers(settings)?;
        Ok(Self::new(runtime, sources.fetchers, sources.activity))
    }

    pub fn runtime(&self) -> Arc<dyn LlmRuntime> {
        Arc::clone(&self.runtime)
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.fetchers.iter().map(|f| f.name()).collect()
    }

    pub fn has_github(&self) -> bool {
        self.reporter.is_configured()
    }

    /// Fetch every configured source in turn and add the brief.
    ///
    /// Failed sources are logged and returned as failures. Fails only when
    /// sources were configured, all of them failed and there is no brief.
    /// With nothing configured and no brief, sample data is used.
    pub async fn gather(
        &self,
        days_back: u32,
        brief: Option<&ProductBrief>,
    ) -> Result<GatheredData, AgentError> {
        let mut data = RawSourceData::new();
        let mut failures = Vec::new();

        for fetcher in &self.fetchers {
            let source = fetcher.name();
            tracing::info!(source, days_back, "fetching source");
            match fetcher.fetch(days_back).await {
                Ok(payload) => data.insert(source, payload),
                Err(e) => {
                    tracing::warn!(source, error = %e, "source fetch failed");
                    failures.push(SourceFailure {
                        source: source.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Some(brief) = brief {
            data.insert(BRIEF_SOURCE, brief.to_source_value(Local::now()));
        }

        if data.is_empty() && !self.fetchers.is_empty() {
            let summary = failures
                .iter()
                .map(|f| format!("{}: {}", f.source, f.error))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(AgentError::AllSourcesFailed(summary));
        }

        let used_sample = data.is_empty();
        if used_sample {
            tracing::info!("no sources configured and no brief, using sample data");
            data = RawSourceData::sample();
        }

        Ok(GatheredData {
            data,
            failures,
            used_sample,
        })
    }

    pub async fn run_github_report(&self, days_back: u32) -> Result<GitHubReport, AgentError> {
        self.reporter.generate_report(days_back).await
    }

    pub async fn run_product_analysis(
        &self,
        brief: Option<&ProductBrief>,
    ) -> Result<ProductAnalysis, AgentError> {
        tracing::info!(with_brief = brief.is_some(), "starting product analysis");
        let gathered = self.gather(DEFAULT_ANALYSIS_DAYS, brief).await?;
        let report = self.analysis.analyze(&gathered.data).await?;
        Ok(ProductAnalysis {
            report,
            prd_context: gathered.prd_context(),
            failures: gathered.failures,
        })
    }

    pub async fn run_prd_generation(
        &self,
        analysis: &AnalysisResult,
        context: Option<&Value>,
    ) -> Result<GeneratedDocs, AgentError> {
        self.prd.generate_documentation(analysis, context).await
    }

    /// Run every stage in order. Never returns an error: failures end the
    /// run in the Failed stage with the error attached to the report.
    pub async fn run_complete_workflow(&self, request: &WorkflowRequest) -> WorkflowReport {
        let mut report = WorkflowReport::new();
        tracing::info!(run_id = %report.run_id, days_back = request.days_back, "workflow started");

        if let Err(e) = self.drive(&mut report, request).await {
            tracing::error!(run_id = %report.run_id, stage = %report.stage, error = %e, "workflow failed");
            let from = report.stage;
            match report.fail(e.to_string()) {
                Ok(()) => log_transition(&report, from),
                Err(t) => tracing::error!(run_id = %report.run_id, error = %t, "cannot record failure"),
            }
        }

        tracing::info!(
            run_id = %report.run_id,
            status = report.status.map(|s| s.label()).unwrap_or("unknown"),
            issues = report.issues.len(),
            "workflow finished"
        );
        report
    }

    async fn drive(
        &self,
        report: &mut WorkflowReport,
        request: &WorkflowRequest,
    ) -> Result<(), AgentError> {
        advance(report, WorkflowStage::Fetching)?;
        let gathered = self.gather(request.days_back, request.brief.as_ref()).await?;
        for failure in &gathered.failures {
            report.record_issue(&failure.source, &failure.error);
        }
        report.sources = gathered.data.source_names();

        advance(report, WorkflowStage::Analyzing)?;
        let analysis = self.analysis.analyze(&gathered.data).await?.analysis;
        report.analysis = Some(analysis.clone());

        advance(report, WorkflowStage::Generating)?;
        if let Some(github) = gathered.data.get("github") {
            self.attach_github_report(report, github).await;
        }

        let context = gathered.prd_context();
        let docs = self
            .prd
            .generate_documentation(&analysis, context.as_ref())
            .await?;
        report.docs = Some(docs);

        advance(report, WorkflowStage::Done)?;
        Ok(())
    }

    /// Report on the GitHub payload already fetched for this run. Errors
    /// become issues rather than failing the stage.
    async fn attach_github_report(&self, report: &mut WorkflowReport, payload: &Value) {
        let snapshot = match serde_json::from_value::<GitHubSnapshot>(payload.clone()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "GitHub payload is not a snapshot");
                report.record_issue("github_report", e.to_string());
                return;
            }
        };

        match self.reporter.report_from_snapshot(snapshot).await {
            Ok(github) => report.github_report = Some(github.report),
            Err(e) => {
                tracing::warn!(error = %e, "GitHub report failed");
                report.record_issue("github_report", e.to_string());
            }
        }
    }

    pub async fn monitor_github<F, S>(&self, interval: Duration, shutdown: S, on_report: F) -> usize
    where
        F: FnMut(&GitHubReport),
        S: Future<Output = ()>,
    {
        self.reporter.monitor(interval, shutdown, on_report).await
    }
}

fn advance(report: &mut WorkflowReport, next: WorkflowStage) -> Result<(), AgentError> {
    let from = report.stage;
    report.advance(next)?;
    log_transition(report, from);
    Ok(())
}

fn log_transition(report: &WorkflowReport, from: WorkflowStage) {
    tracing::info!(run_id = %report.run_id, from = %from, to = %report.stage, "workflow transition");
}

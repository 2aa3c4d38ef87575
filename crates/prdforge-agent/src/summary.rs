// ABOUTME: Short executive summaries of reports, analyses, documents and workflow runs for display.
// ABOUTME: Asks the summarizer role first and falls back to a fixed digest when the call fails.

use std::sync::Arc;

use chrono::Local;

use prdforge_core::model::{AnalysisResult, GeneratedDocs};
use prdforge_core::workflow::{WorkflowReport, WorkflowStatus};

use crate::prompt;
use crate::reporter::GitHubReport;
use crate::runtime::LlmRuntime;

const GITHUB_FORMAT: &str = "Transform the verbose GitHub report into a clean, minimal format with:
- 📊 **Executive Summary** (2-3 lines max)
- 🔥 **Key Highlights** (3-5 bullet points)
- 📈 **Metrics** (important numbers only)
- ⚠️ **Action Items** (if any critical issues)
Keep it under 200 words total.";

const ANALYSIS_FORMAT: &str = "Extract and present only the most critical analysis insights as:
- 🎯 **Key Goals** (top 3 only)
- ⚠️ **Critical Constraints** (top 3 only)
- 💡 **Top Recommendations** (top 3 only)
- 📊 **Impact Summary** (one line each for growth, revenue, UX)
Keep it under 150 words total.";

const PRD_FORMAT: &str = "Summarize PRD generation results as:
- 📋 **PRD Status** (completion status)
- 🧪 **Test Scenarios** (number generated)
- 📄 **Document Summary** (2-3 key points from the PRD)
- ✅ **Next Steps** (immediate actions)
Keep it under 100 words total.";

const WORKFLOW_FORMAT: &str = "Create an executive summary of the complete workflow as:
- 🚀 **Workflow Status** (overall completion)
- 📊 **Key Metrics** (commits, goals, docs generated)
- 🎯 **Main Outcomes** (top 3 achievements)
- 🔄 **Next Actions** (immediate next steps)
Keep it under 120 words total. Focus on business value.";

pub struct OutputFormatter {
    runtime: Arc<dyn LlmRuntime>,
}

impl OutputFormatter {
    pub fn new(runtime: Arc<dyn LlmRuntime>) -> Self {
        Self { runtime }
    }

    async fn summarize(&self, kind: &str, format: &str, facts: String, fallback: String) -> String {
        match self.runtime.complete(&prompt::summary(format, &facts)).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => fallback,
            Err(e) => {
                tracing::warn!(kind, error = %e, "summary call failed, using digest");
                fallback
            }
        }
    }

    pub async fn summarize_github(&self, report: &GitHubReport) -> String {
        let facts = format!(
            "Report: {}\nCommits: {} commits\nPRs: {} pull requests\nRepository: {}",
            report.report,
            report.snapshot.commits.len(),
            report.snapshot.pull_requests.len(),
            repository_name(report)
        );
        self.summarize("github", GITHUB_FORMAT, facts, github_digest(report))
            .await
    }

    pub async fn summarize_analysis(&self, analysis: &AnalysisResult) -> String {
        let facts = format!(
            "Goals: {:?}\nConstraints: {:?}\nRecommendations: {:?}\nImpact: {}",
            analysis.goals, analysis.constraints, analysis.recommendations, analysis.impact_notes
        );
        self.summarize("analysis", ANALYSIS_FORMAT, facts, analysis_digest(analysis))
            .await
    }

    pub async fn summarize_prd(&self, docs: &GeneratedDocs) -> String {
        let scenarios: usize = docs.features.iter().map(|f| f.scenarios.len()).sum();
        let facts = format!(
            "Title: {}\nPRD Length: {} characters\nGherkin Length: {} characters\nScenarios: {}\nObjectives: {:?}",
            docs.prd_document.title,
            docs.prd.len(),
            docs.gherkin.len(),
            scenarios,
            docs.prd_document.objectives
        );
        self.summarize("prd", PRD_FORMAT, facts, prd_digest(docs)).await
    }

    pub async fn summarize_workflow(&self, report: &WorkflowReport) -> String {
        let status = report.status.map(|s| s.label()).unwrap_or("running");
        let goals = report.analysis.as_ref().map_or(0, |a| a.goals.len());
        let facts = format!(
            "Status: {}\nSources: {:?}\nGitHub report: {}\nAnalysis: {} goals identified\nDocumentation: {}\nIssues: {}\nStarted: {}",
            status,
            report.sources,
            if report.github_report.is_some() { "Generated" } else { "Not generated" },
            goals,
            if report.docs.is_some() { "Generated" } else { "Not generated" },
            report.issues.len(),
            report.started_at.to_rfc3339()
        );
        self.summarize("workflow", WORKFLOW_FORMAT, facts, workflow_digest(report))
            .await
    }
}

fn repository_name(report: &GitHubReport) -> &str {
    let name = report.snapshot.repository.full_name.as_str();
    if name.is_empty() { "Unknown" } else { name }
}

pub fn github_digest(report: &GitHubReport) -> String {
    let commits = report.snapshot.commits.len();
    format!(
        "📊 **GitHub Summary**\n• **Repository:** {}\n• **Activity:** {} commits, {} PRs\n• **Status:** {}",
        repository_name(report),
        commits,
        report.snapshot.pull_requests.len(),
        if commits > 0 { "Active" } else { "Quiet" }
    )
}

pub fn analysis_digest(analysis: &AnalysisResult) -> String {
    format!(
        "🎯 **Analysis Summary**\n• **Goals Identified:** {}\n• **Status:** {}\n• **Action Required:** Review recommendations",
        analysis.goals.len(),
        if analysis.is_empty() { "Partial" } else { "Completed" }
    )
}

pub fn prd_digest(docs: &GeneratedDocs) -> String {
    let scenarios: usize = docs.features.iter().map(|f| f.scenarios.len()).sum();
    format!(
        "📋 **PRD Summary**\n• **Title:** {}\n• **Test Scenarios:** {}\n• **Next:** Review and approve documentation",
        docs.prd_document.title, scenarios
    )
}

pub fn workflow_digest(report: &WorkflowReport) -> String {
    let status = match report.status {
        Some(WorkflowStatus::Success) => "Success",
        Some(WorkflowStatus::Partial) => "Partial",
        Some(WorkflowStatus::Failed) => "Failed",
        None => "Running",
    };
    let completed = report
        .finished_at
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "🚀 **Workflow Summary**\n• **Status:** {}\n• **Completion:** {}\n• **Action:** Review results and proceed",
        status, completed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubRuntime, sample_snapshot};
    use chrono::Utc;
    use prdforge_core::workflow::WorkflowStage;

    fn github_report() -> GitHubReport {
        GitHubReport {
            snapshot: sample_snapshot(),
            report: "long report".into(),
            generated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn summary_comes_from_llm_when_available() {
        let runtime = Arc::new(StubRuntime::new("📊 short"));
        let formatter = OutputFormatter::new(runtime.clone());
        assert_eq!(formatter.summarize_github(&github_report()).await, "📊 short");

        let request = &runtime.requests()[0];
        assert!((request.temperature - 0.1).abs() < f32::EPSILON);
        assert!(request.prompt.contains("Commits: 2 commits"));
        assert!(request.prompt.contains("Repository: acme/app"));
    }

    #[tokio::test]
    async fn failed_call_falls_back_to_digest() {
        let formatter = OutputFormatter::new(Arc::new(StubRuntime::failing()));
        let text = formatter.summarize_github(&github_report()).await;
        assert_eq!(
            text,
            "📊 **GitHub Summary**\n• **Repository:** acme/app\n• **Activity:** 2 commits, 1 PRs\n• **Status:** Active"
        );

        let analysis = formatter.summarize_analysis(&AnalysisResult::default()).await;
        assert!(analysis.contains("**Goals Identified:** 0"));
        assert!(analysis.contains("**Status:** Partial"));
    }

    #[tokio::test]
    async fn workflow_digest_reports_status() {
        let mut report = WorkflowReport::new();
        report.advance(WorkflowStage::Fetching).unwrap();
        report.fail("boom").unwrap();

        let formatter = OutputFormatter::new(Arc::new(StubRuntime::failing()));
        let text = formatter.summarize_workflow(&report).await;
        assert!(text.starts_with("🚀 **Workflow Summary**"));
        assert!(text.contains("**Status:** Failed"));
    }

    #[test]
    fn quiet_repository_digest() {
        let mut report = github_report();
        report.snapshot.commits.clear();
        assert!(github_digest(&report).ends_with("**Status:** Quiet"));
    }
}

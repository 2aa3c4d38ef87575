// ABOUTME: Renders analysis results, PRDs and GitHub activity digests as markdown.
// ABOUTME: PRD and analysis use askama templates; the activity digest is written directly.

use std::fmt::Write;

use askama::Template;
use thiserror::Error;

use crate::activity::GitHubSnapshot;
use crate::model::{AnalysisResult, PrdDocument};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template rendering failed: {0}")]
    Template(#[from] askama::Error),
}

#[derive(Template)]
#[template(path = "prd.md", escape = "none")]
struct PrdTemplate<'a> {
    doc: &'a PrdDocument,
}

#[derive(Template)]
#[template(path = "analysis.md", escape = "none")]
struct AnalysisTemplate<'a> {
    analysis: &'a AnalysisResult,
}

/// Render a PRD as markdown. Output always ends with a newline.
pub fn render_prd(doc: &PrdDocument) -> Result<String, RenderError> {
    let out = PrdTemplate { doc }.render()?;
    Ok(terminate(out))
}

/// Render an analysis result as markdown. Output always ends with a newline.
pub fn render_analysis(analysis: &AnalysisResult) -> Result<String, RenderError> {
    let out = AnalysisTemplate { analysis }.render()?;
    Ok(terminate(out))
}

fn terminate(mut out: String) -> String {
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Deterministic activity summary used when the LLM report is unavailable
/// or for quick display.
pub fn render_activity_digest(snapshot: &GitHubSnapshot, generated_at: &str) -> String {
    let mut out = String::new();
    let repo = if snapshot.repository.full_name.is_empty() {
        "Unknown"
    } else {
        snapshot.repository.full_name.as_str()
    };

    writeln!(out, "# GitHub Activity Report").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "**Repository:** {}", repo).unwrap();
    writeln!(out, "**Period:** last {} day(s)", snapshot.days_back).unwrap();
    writeln!(out, "**Generated:** {}", generated_at).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Commit Summary").unwrap();
    writeln!(out, "- Total commits: {}", snapshot.commits.len()).unwrap();
    if !snapshot.commits.is_empty() {
        writeln!(out, "- Lines added: {}", snapshot.total_additions()).unwrap();
        writeln!(out, "- Lines deleted: {}", snapshot.total_deletions()).unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "## Pull Requests").unwrap();
    writeln!(out, "- Open PRs: {}", snapshot.pull_requests.len()).unwrap();

    out
}

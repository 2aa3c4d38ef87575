// ABOUTME: Builds the user prompts sent to each role from fetched data, analyses and documents.
// ABOUTME: Every builder returns a CompletionRequest carrying the role's system prompt and temperature.

use std::fmt::Write;

use serde_json::Value;

use prdforge_core::activity::GitHubSnapshot;
use prdforge_core::format::preview;
use prdforge_core::model::{AnalysisResult, PrdDocument, RawSourceData};

use crate::roles::AgentRole;
use crate::runtime::CompletionRequest;

/// Commits listed in the activity prompt.
const PROMPT_COMMITS: usize = 10;
/// Pull requests listed in the activity prompt.
const PROMPT_PULLS: usize = 5;
const COMMIT_MESSAGE_CHARS: usize = 100;

/// One analyst's free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoleAnalysis {
    pub role: AgentRole,
    pub analysis: String,
}

fn request(role: AgentRole, prompt: String) -> CompletionRequest {
    CompletionRequest::new(role.system_prompt(), prompt, role.temperature())
}

fn bullets(out: &mut String, items: &[String]) {
    if items.is_empty() {
        writeln!(out, "- (none)").unwrap();
    }
    for item in items {
        writeln!(out, "- {}", item).unwrap();
    }
}

pub fn github_report(snapshot: &GitHubSnapshot) -> CompletionRequest {
    let repo = &snapshot.repository;
    let mut out = String::new();

    writeln!(out, "Generate a daily GitHub activity report for the following data:").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "Repository: {}",
        if repo.full_name.is_empty() { "Unknown" } else { &repo.full_name }
    )
    .unwrap();
    writeln!(out, "Period: Last {} day(s)", snapshot.days_back).unwrap();
    writeln!(out).unwrap();

    writeln!(out, "Commits ({}):", snapshot.commits.len()).unwrap();
    if snapshot.commits.is_empty() {
        writeln!(out, "No commits found.").unwrap();
    }
    for commit in snapshot.commits.iter().take(PROMPT_COMMITS) {
        writeln!(
            out,
            "- {}: {} by {} (+{}/-{})",
            commit.sha,
            preview(commit.message.trim(), COMMIT_MESSAGE_CHARS),
            commit.author,
            commit.additions,
            commit.deletions
        )
        .unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "Pull Requests ({}):", snapshot.pull_requests.len()).unwrap();
    if snapshot.pull_requests.is_empty() {
        writeln!(out, "No open pull requests.").unwrap();
    }
    for pr in snapshot.pull_requests.iter().take(PROMPT_PULLS) {
        writeln!(out, "- #{}: {} by {} ({})", pr.number, pr.title, pr.author, pr.state).unwrap();
    }
    writeln!(out).unwrap();

    writeln!(out, "Repository Stats:").unwrap();
    writeln!(out, "- Stars: {}", repo.stars).unwrap();
    writeln!(out, "- Forks: {}", repo.forks).unwrap();
    writeln!(out, "- Open Issues: {}", repo.open_issues).unwrap();
    writeln!(
        out,
        "- Primary Language: {}",
        repo.language.as_deref().unwrap_or("Unknown")
    )
    .unwrap();

    request(AgentRole::GitHubAnalyst, out)
}

/// Prompt for one of the three analysts over all gathered data.
pub fn analyst(role: AgentRole, data: &RawSourceData) -> CompletionRequest {
    let focus = match role {
        AgentRole::TechnicalAnalyst => "technical",
        AgentRole::BusinessAnalyst => "business",
        _ => "product",
    };
    request(
        role,
        format!(
            "Analyze this {} data from the sources [{}]:\n\n{}",
            focus,
            data.source_names().join(", "),
            data.to_prompt_json()
        ),
    )
}

pub fn synthesis(analyses: &[RoleAnalysis], data: &RawSourceData) -> CompletionRequest {
    let analyses_text = analyses
        .iter()
        .map(|a| format!("**{}:**\n{}", a.role.title(), a.analysis.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");

    request(
        AgentRole::Synthesizer,
        format!(
            "Synthesize the following analyses into a comprehensive product requirements \
             analysis:\n\n{}\n\nOriginal Data Sources: [{}]\n\nProvide a structured synthesis \
             covering goals, constraints, edge cases, follow-up questions, impact analysis, and \
             recommendations.",
            analyses_text,
            data.source_names().join(", ")
        ),
    )
}

pub fn prd(analysis: &AnalysisResult, context: Option<&Value>) -> CompletionRequest {
    let mut out = String::new();
    writeln!(out, "Create a comprehensive PRD based on this analysis:").unwrap();
    writeln!(out).unwrap();

    for (title, items) in [
        ("GOALS", &analysis.goals),
        ("CONSTRAINTS", &analysis.constraints),
        ("EDGE CASES", &analysis.edge_cases),
        ("FOLLOW-UP QUESTIONS", &analysis.follow_up_questions),
        ("RECOMMENDATIONS", &analysis.recommendations),
    ] {
        writeln!(out, "{}:", title).unwrap();
        bullets(&mut out, items);
        writeln!(out).unwrap();
    }

    writeln!(out, "IMPACT ANALYSIS:").unwrap();
    if analysis.impact_notes.is_empty() {
        writeln!(out, "(none)").unwrap();
    } else {
        writeln!(out, "{}", analysis.impact_notes).unwrap();
    }
    writeln!(out).unwrap();

    match context {
        Some(ctx) => writeln!(
            out,
            "Project Context: {}",
            serde_json::to_string_pretty(ctx).unwrap_or_else(|_| ctx.to_string())
        )
        .unwrap(),
        None => writeln!(out, "No additional context provided.").unwrap(),
    }
    writeln!(out).unwrap();
    write!(
        out,
        "Generate a structured PRD with specific sections for objectives, user stories, requirements, etc."
    )
    .unwrap();

    request(AgentRole::PrdWriter, out)
}

pub fn gherkin(prd: &PrdDocument) -> CompletionRequest {
    let mut out = String::new();
    writeln!(out, "Create Gherkin test scenarios for this PRD:").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "TITLE: {}", prd.title).unwrap();
    writeln!(out, "OVERVIEW: {}", prd.overview).unwrap();
    writeln!(out).unwrap();
    for (title, items) in [
        ("USER STORIES", &prd.user_stories),
        ("FUNCTIONAL REQUIREMENTS", &prd.functional_requirements),
        ("NON-FUNCTIONAL REQUIREMENTS", &prd.non_functional_requirements),
    ] {
        writeln!(out, "{}:", title).unwrap();
        bullets(&mut out, items);
        writeln!(out).unwrap();
    }
    write!(
        out,
        "Generate comprehensive Gherkin scenarios covering main functionality, edge cases, and acceptance criteria."
    )
    .unwrap();

    request(AgentRole::QaEngineer, out)
}

/// Summarizer prompt: `format` describes the wanted layout, `facts` the input.
pub fn summary(format: &str, facts: &str) -> CompletionRequest {
    request(
        AgentRole::Summarizer,
        format!("{}\n\nInput:\n{}\n\nShow only the most important items.", format, facts),
    )
}

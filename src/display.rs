// ABOUTME: Terminal rendering of reports, analyses, documents and workflow results.
// ABOUTME: Only the binary prints; library crates log through tracing.

use std::path::PathBuf;

use prdforge_agent::{GitHubReport, ProductAnalysis};
use prdforge_core::format::{bullet_list, numbered_list, preview, section_header};
use prdforge_core::model::{AnalysisResult, GeneratedDocs};
use prdforge_core::workflow::WorkflowReport;

const RULE_WIDTH: usize = 60;
/// Characters of each document shown before truncation.
const DOC_PREVIEW: usize = 500;
const WORKFLOW_GOALS: usize = 5;

pub fn banner(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}\n{}\n{}", rule, title, rule);
}

fn rule() {
    println!("{}\n", "=".repeat(RULE_WIDTH));
}

pub fn github_report(report: &GitHubReport) {
    banner("GITHUB ACTIVITY REPORT");
    println!("{}", report.report);
    rule();
}

fn counted(emoji: &str, title: &str, noun: &str, items: &[String]) {
    println!("\n{} {} ({} {}):", emoji, title, items.len(), noun);
    if !items.is_empty() {
        println!("{}", numbered_list(items));
    }
}

pub fn analysis(analysis: &AnalysisResult) {
    banner("PRODUCT ANALYSIS RESULTS");
    counted("🎯", "GOALS", "identified", &analysis.goals);
    counted("⚠️ ", "CONSTRAINTS", "identified", &analysis.constraints);
    counted("🚨", "EDGE CASES", "identified", &analysis.edge_cases);
    counted(
        "❓",
        "FOLLOW-UP QUESTIONS",
        "identified",
        &analysis.follow_up_questions,
    );
    println!("\n📊 IMPACT ANALYSIS:");
    if analysis.impact_notes.is_empty() {
        println!("   (none)");
    }
    for line in analysis.impact_notes.lines() {
        println!("   {}", line);
    }
    counted("💡", "RECOMMENDATIONS", "provided", &analysis.recommendations);
    rule();
}

pub fn product_analysis(result: &ProductAnalysis) {
    for failure in &result.failures {
        println!("⚠️  {} unavailable: {}", failure.source, failure.error);
    }
    println!("Sources analyzed: {}", result.report.sources.join(", "));
    analysis(&result.report.analysis);
}

pub fn documentation(docs: &GeneratedDocs) {
    banner("PRD AND GHERKIN GENERATION COMPLETED");
    println!("PRD Document:\n{}", preview(&docs.prd, DOC_PREVIEW));
    println!("\nGherkin Scenarios:\n{}", preview(&docs.gherkin, DOC_PREVIEW));
    rule();
}

pub fn workflow(report: &WorkflowReport) {
    print!("{}", section_header("Workflow", "🚀"));
    println!();
    let path: Vec<&str> = report.path().iter().map(|s| s.label()).collect();
    println!("Stages: {}", path.join(" → "));
    if !report.sources.is_empty() {
        println!("Sources: {}", report.sources.join(", "));
    }

    if let Some(ref github) = report.github_report {
        println!("\nGitHub report:\n{}", preview(github, DOC_PREVIEW));
    }
    if let Some(ref analysis) = report.analysis {
        println!(
            "\nAnalysis: {} goals, {} constraints, {} edge cases",
            analysis.goals.len(),
            analysis.constraints.len(),
            analysis.edge_cases.len()
        );
        println!("{}", bullet_list(&analysis.goals, WORKFLOW_GOALS));
    }
    if let Some(ref docs) = report.docs {
        documentation(docs);
    }

    for issue in &report.issues {
        println!("⚠️  [{}] {}: {}", issue.stage, issue.source, issue.message);
    }
    if let Some(ref failure) = report.failure {
        println!("❌ Failed during {}: {}", failure.stage, failure.error);
    }

    let status = report.status.map(|s| s.label()).unwrap_or("unknown");
    println!("\nWorkflow Status: {}", status);
}

pub fn saved(paths: &[PathBuf]) {
    if paths.is_empty() {
        println!("📁 Nothing to save");
        return;
    }
    for path in paths {
        println!("📁 Saved {}", path.display());
    }
}

// ABOUTME: Interactive main menu shown when prdforge runs without a subcommand.
// ABOUTME: Errors from an action are printed and the menu is shown again.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use prdforge_agent::{Orchestrator, WorkflowRequest};
use prdforge_core::model::ProductBrief;
use prdforge_core::Settings;

use crate::cli;

const CHOICES: [&str; 5] = [
    "GitHub report only",
    "Product analysis only",
    "Complete workflow (GitHub + analysis + PRD)",
    "Start GitHub monitoring",
    "Exit",
];

pub async fn run(
    orchestrator: &Orchestrator,
    settings: &Settings,
    summarize: bool,
) -> anyhow::Result<()> {
    let theme = ColorfulTheme::default();
    println!("🤖 prdforge multi-agent system");
    let sources = orchestrator.source_names();
    if sources.is_empty() {
        println!("Sources: none configured, analysis uses sample data");
    } else {
        println!("Sources: {}", sources.join(", "));
    }
    if !orchestrator.has_github() {
        println!("⚠️  GitHub is not configured; reports and monitoring are unavailable");
    }

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&CHOICES)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => {
                let days = ask_days(&theme, "Number of days to analyze")?;
                cli::github_report(orchestrator, days, None, summarize).await
            }
            1 => {
                let brief = ask_brief(&theme)?;
                cli::product_analysis(orchestrator, Some(brief), summarize).await
            }
            2 => {
                let days = ask_days(&theme, "Number of days for GitHub analysis")?;
                let brief = ask_brief(&theme)?;
                let save = Confirm::with_theme(&theme)
                    .with_prompt("Save results to files?")
                    .default(false)
                    .interact()?;
                let request = WorkflowRequest {
                    days_back: days,
                    brief: Some(brief),
                };
                let dir = save.then_some(settings.output_dir.as_path());
                cli::complete_workflow(orchestrator, &request, dir, summarize).await
            }
            3 => cli::monitor(orchestrator, settings.report_schedule_hours).await,
            _ => {
                println!("👋 Goodbye!");
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            tracing::error!(error = %e, "menu action failed");
            println!("❌ Error: {:#}", e);
        }
    }
}

fn ask_days(theme: &ColorfulTheme, prompt: &str) -> anyhow::Result<u32> {
    let days = Input::<u32>::with_theme(theme)
        .with_prompt(prompt)
        .default(1)
        .validate_with(|d: &u32| if *d > 0 { Ok(()) } else { Err("must be at least 1") })
        .interact_text()?;
    Ok(days)
}

fn ask_text(theme: &ColorfulTheme, prompt: &str) -> anyhow::Result<String> {
    let answer = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer)
}

fn ask_brief(theme: &ColorfulTheme) -> anyhow::Result<ProductBrief> {
    println!("\n📝 Product requirements (leave blank for defaults)");
    let name = ask_text(theme, "Product or feature name")?;
    let description = ask_text(theme, "Product description")?;
    let users = ask_text(theme, "Target users (e.g. developers, end-users)")?;
    let goals = ask_text(theme, "Business goals (comma separated)")?;
    let stack = ask_text(theme, "Technical stack")?;
    let constraints = ask_text(theme, "Known constraints (comma separated)")?;
    Ok(ProductBrief::from_answers(
        &name,
        &description,
        &users,
        &goals,
        &stack,
        &constraints,
    ))
}

// ABOUTME: Command-line surface: clap subcommands plus the operations shared with the interactive menu.
// ABOUTME: With no subcommand the binary falls back to the menu.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use prdforge_agent::{Orchestrator, OutputFormatter, WorkflowRequest};
use prdforge_core::model::ProductBrief;
use prdforge_core::output::{save_artifact, save_results, timestamp_slug};
use prdforge_core::render::render_activity_digest;
use prdforge_core::Settings;
use prdforge_core::config::schedule_interval;
use prdforge_server::AppState;

use crate::{display, menu};

#[derive(Parser, Debug)]
#[command(name = "prdforge")]
#[command(about = "Turn repository activity and product notes into PRDs and Gherkin scenarios")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Print an LLM-written summary after each result
    #[arg(long, global = true)]
    pub summarize: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a GitHub activity report
    Report {
        /// Days of history to cover
        #[arg(short, long, default_value_t = 1)]
        days: u32,

        /// Write the report to the output directory
        #[arg(long)]
        save: bool,
    },

    /// Run the analyst team over every configured source
    Analyze {
        #[command(flatten)]
        brief: BriefArgs,
    },

    /// Fetch, analyze and generate a PRD with Gherkin scenarios
    Workflow {
        /// Days of history to cover
        #[arg(short, long, default_value_t = 1)]
        days: u32,

        /// Write every artifact to the output directory
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        brief: BriefArgs,
    },

    /// Report on GitHub activity now and then on a fixed interval
    Monitor {
        /// Hours between reports, overriding REPORT_SCHEDULE_HOURS
        #[arg(long)]
        hours: Option<u64>,
    },

    /// Start the JSON API
    Serve {
        /// Address to bind, overriding PRDFORGE_BIND
        #[arg(long)]
        bind: Option<std::net::SocketAddr>,

        /// Save workflow artifacts to the output directory
        #[arg(long)]
        save: bool,
    },
}

/// Product brief fields accepted on the command line. List fields are
/// comma separated.
#[derive(Args, Debug, Default, Clone)]
pub struct BriefArgs {
    /// Product or feature name
    #[arg(long)]
    pub product_name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Target users, e.g. "developers, end-users"
    #[arg(long)]
    pub target_users: Option<String>,

    /// Business goals, comma separated
    #[arg(long)]
    pub goals: Option<String>,

    /// Technical stack, comma separated
    #[arg(long)]
    pub stack: Option<String>,

    /// Known constraints, comma separated
    #[arg(long)]
    pub constraints: Option<String>,
}

impl BriefArgs {
    /// `None` when no brief field was given.
    pub fn to_brief(&self) -> Option<ProductBrief> {
        let fields = [
            &self.product_name,
            &self.description,
            &self.target_users,
            &self.goals,
            &self.stack,
            &self.constraints,
        ];
        if fields
            .iter()
            .all(|f| f.as_deref().is_none_or(|v| v.trim().is_empty()))
        {
            return None;
        }

        let text = |f: &Option<String>| f.clone().unwrap_or_default();
        Some(ProductBrief::from_answers(
            &text(&self.product_name),
            &text(&self.description),
            &text(&self.target_users),
            &text(&self.goals),
            &text(&self.stack),
            &text(&self.constraints),
        ))
    }
}

pub async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::from_settings(&settings)?;
    let summarize = cli.summarize;

    match cli.command {
        None => menu::run(&orchestrator, &settings, summarize).await,
        Some(Command::Report { days, save }) => {
            let dir = save.then_some(settings.output_dir.as_path());
            github_report(&orchestrator, days, dir, summarize).await
        }
        Some(Command::Analyze { brief }) => {
            product_analysis(&orchestrator, brief.to_brief(), summarize).await
        }
        Some(Command::Workflow { days, save, brief }) => {
            let request = WorkflowRequest {
                days_back: days,
                brief: brief.to_brief(),
            };
            let dir = save.then_some(settings.output_dir.as_path());
            complete_workflow(&orchestrator, &request, dir, summarize).await
        }
        Some(Command::Monitor { hours }) => {
            monitor(&orchestrator, hours.unwrap_or(settings.report_schedule_hours)).await
        }
        Some(Command::Serve { bind, save }) => {
            let mut state = AppState::new(orchestrator);
            if save {
                state = state.with_save_dir(settings.output_dir.clone());
            }
            let addr = bind.unwrap_or(settings.bind);
            prdforge_server::serve(Arc::new(state), addr, shutdown_signal())
                .await
                .with_context(|| format!("serving on {}", addr))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

pub async fn github_report(
    orchestrator: &Orchestrator,
    days: u32,
    save_dir: Option<&Path>,
    summarize: bool,
) -> anyhow::Result<()> {
    println!("📊 Generating GitHub report for the last {} day(s)...", days);
    let report = orchestrator.run_github_report(days).await?;
    display::github_report(&report);

    if summarize {
        let formatter = OutputFormatter::new(orchestrator.runtime());
        println!("{}", formatter.summarize_github(&report).await);
    }

    if let Some(dir) = save_dir {
        let stamp = timestamp_slug(report.generated_at);
        let contents = format!(
            "{}\n## Agent Report\n\n{}\n",
            render_activity_digest(&report.snapshot, &report.generated_at.to_rfc3339()),
            report.report
        );
        let path = save_artifact(dir, &format!("github_report_{}.md", stamp), &contents)?;
        display::saved(&[path]);
    }
    Ok(())
}

pub async fn product_analysis(
    orchestrator: &Orchestrator,
    brief: Option<ProductBrief>,
    summarize: bool,
) -> anyhow::Result<()> {
    println!("🔍 Running product analysis...");
    let result = orchestrator.run_product_analysis(brief.as_ref()).await?;
    display::product_analysis(&result);

    if summarize {
        let formatter = OutputFormatter::new(orchestrator.runtime());
        println!("{}", formatter.summarize_analysis(&result.report.analysis).await);
    }
    Ok(())
}

pub async fn complete_workflow(
    orchestrator: &Orchestrator,
    request: &WorkflowRequest,
    save_dir: Option<&Path>,
    summarize: bool,
) -> anyhow::Result<()> {
    println!("🚀 Running complete workflow...");
    let report = orchestrator.run_complete_workflow(request).await;
    display::workflow(&report);

    if summarize {
        let formatter = OutputFormatter::new(orchestrator.runtime());
        println!("{}", formatter.summarize_workflow(&report).await);
        if let Some(ref docs) = report.docs {
            println!("{}", formatter.summarize_prd(docs).await);
        }
    }

    if let Some(dir) = save_dir {
        let paths = save_results(dir, &report)?;
        display::saved(&paths);
    }
    Ok(())
}

pub async fn monitor(orchestrator: &Orchestrator, hours: u64) -> anyhow::Result<()> {
    anyhow::ensure!(orchestrator.has_github(), "GitHub is not configured");
    let interval = schedule_interval(hours)?;
    println!(
        "⏰ Monitoring GitHub every {} hour(s). Press Ctrl+C to stop.",
        hours
    );
    let delivered = orchestrator
        .monitor_github(interval, shutdown_signal(), |report| {
            display::banner("DAILY GITHUB REPORT");
            println!("{}", report.report);
        })
        .await;
    println!("Monitoring stopped after {} report(s).", delivered);
    Ok(())
}

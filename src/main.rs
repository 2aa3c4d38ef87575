// ABOUTME: Entry point for the prdforge binary.
// ABOUTME: Loads .env and settings, initializes tracing, then dispatches to the menu or a subcommand.

mod cli;
mod display;
mod menu;

use clap::Parser;
use prdforge_core::Settings;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // A missing .env file is normal.
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    tracing::info!(
        provider = %settings.llm.provider,
        sources = ?settings.enabled_sources(),
        "prdforge starting up"
    );

    cli::run(args, settings).await
}

// ABOUTME: The GitHub reporter agent: turns a repository activity snapshot into a markdown report.
// ABOUTME: Also runs the scheduled monitoring loop that regenerates the report until shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use prdforge_core::activity::GitHubSnapshot;
use prdforge_sources::ActivitySource;

use crate::error::AgentError;
use crate::prompt;
use crate::runtime::LlmRuntime;

/// Report text used when the window has no commits and no open PRs.
pub const QUIET_REPORT: &str = "No activity found for the specified period.";

/// Window the monitoring loop reports on each run.
pub const MONITOR_DAYS: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubReport {
    pub snapshot: GitHubSnapshot,
    pub report: String,
    pub generated_at: DateTime<Utc>,
}

pub struct GitHubReporter {
    runtime: Arc<dyn LlmRuntime>,
    source: Option<Arc<dyn ActivitySource>>,
}

impl GitHubReporter {
    pub fn new(runtime: Arc<dyn LlmRuntime>, source: Option<Arc<dyn ActivitySource>>) -> Self {
        Self { runtime, source }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Fetch the last `days_back` days of activity and report on it.
    pub async fn generate_report(&self, days_back: u32) -> Result<GitHubReport, AgentError> {
        let source = self
            .source
            .as_ref()
            .ok_or(AgentError::NotConfigured("GitHub"))?;

        tracing::info!(repository = %source.repository(), days_back, "fetching GitHub activity");
        let snapshot = source.snapshot(days_back).await?;
        self.report_from_snapshot(snapshot).await
    }

    /// Report on an already fetched snapshot. A quiet window is reported
    /// without calling the LLM.
    pub async fn report_from_snapshot(
        &self,
        snapshot: GitHubSnapshot,
    ) -> Result<GitHubReport, AgentError> {
        let report = if snapshot.is_quiet() {
            tracing::info!(days_back = snapshot.days_back, "no GitHub activity in window");
            QUIET_REPORT.to_string()
        } else {
            tracing::info!(
                commits = snapshot.commits.len(),
                pull_requests = snapshot.pull_requests.len(),
                "generating GitHub report"
            );
            self.runtime
                .complete(&prompt::github_report(&snapshot))
                .await?
        };

        Ok(GitHubReport {
            snapshot,
            report,
            generated_at: Utc::now(),
        })
    }

    /// Generate a one-day report immediately and then every `interval`
    /// until `shutdown` resolves. Failed runs are logged and skipped.
    /// Returns the number of reports produced.
    pub async fn monitor<F, S>(&self, interval: Duration, shutdown: S, mut on_report: F) -> usize
    where
        F: FnMut(&GitHubReport),
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = interval.as_secs(), "GitHub monitoring started");
        let mut produced = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!(produced, "GitHub monitoring stopped");
                    return produced;
                }
                _ = ticker.tick() => {
                    match self.generate_report(MONITOR_DAYS).await {
                        Ok(report) => {
                            produced += 1;
                            on_report(&report);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "scheduled GitHub report failed");
                        }
                    }
                }
            }
        }
    }
}

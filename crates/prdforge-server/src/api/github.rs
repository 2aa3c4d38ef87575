// ABOUTME: GitHub report handler: summarizes the last N days of repository activity.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::api::validate_days;
use crate::app_state::SharedState;
use crate::error::ApiError;

/// GET /api/github-report/{days} - Generate a report for the last `days` days.
pub async fn github_report(
    State(state): State<SharedState>,
    Path(days): Path<u32>,
) -> Result<Json<Value>, ApiError> {
    let days = validate_days(days)?;
    let report = state.orchestrator.run_github_report(days).await?;
    let snapshot = &report.snapshot;

    Ok(Json(json!({
        "status": "success",
        "days": days,
        "report": report.report,
        "commits": snapshot.commits,
        "pull_requests": snapshot.pull_requests,
        "repository_stats": snapshot.repository,
        "generated_at": report.generated_at.to_rfc3339(),
    })))
}

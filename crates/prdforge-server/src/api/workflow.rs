// ABOUTME: Complete workflow handler. Workflow failures are reported in-band with HTTP 200.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use prdforge_agent::WorkflowRequest;
use prdforge_core::output::save_results;

use crate::api::{generated_at, validate_days};
use crate::app_state::SharedState;
use crate::error::ApiError;

/// GET /api/complete-workflow/{days} - Run fetch, analysis and generation.
pub async fn complete_workflow(
    State(state): State<SharedState>,
    Path(days): Path<u32>,
) -> Result<Json<Value>, ApiError> {
    let days = validate_days(days)?;
    let report = state
        .orchestrator
        .run_complete_workflow(&WorkflowRequest {
            days_back: days,
            brief: None,
        })
        .await;

    let mut saved = Vec::new();
    if let Some(ref dir) = state.save_dir {
        match save_results(dir, &report) {
            Ok(paths) => saved = paths,
            Err(e) => tracing::error!(error = %e, "failed to save workflow artifacts"),
        }
    }

    Ok(Json(json!({
        "status": report.status.map(|s| s.label()).unwrap_or("failed"),
        "workflow": report,
        "saved": saved,
        "generated_at": generated_at(),
    })))
}

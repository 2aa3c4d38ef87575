// ABOUTME: Product analysis and PRD generation handlers.
// ABOUTME: PRD generation accepts an optional partial product brief as its JSON body.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use prdforge_agent::SourceFailure;
use prdforge_core::model::ProductBrief;

use crate::api::generated_at;
use crate::app_state::SharedState;
use crate::error::ApiError;

/// Partial brief accepted over HTTP. Missing or empty fields take the
/// brief defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BriefRequest {
    pub product_name: Option<String>,
    pub description: Option<String>,
    pub target_users: Option<String>,
    pub business_goals: Vec<String>,
    pub technical_stack: Vec<String>,
    pub constraints: Vec<String>,
}

impl BriefRequest {
    pub fn into_brief(self) -> ProductBrief {
        let defaults = ProductBrief::default();
        ProductBrief {
            product_name: text_or(self.product_name, defaults.product_name),
            description: text_or(self.description, defaults.description),
            target_users: text_or(self.target_users, defaults.target_users),
            business_goals: list_or(self.business_goals, defaults.business_goals),
            technical_stack: list_or(self.technical_stack, defaults.technical_stack),
            constraints: list_or(self.constraints, defaults.constraints),
        }
    }
}

fn text_or(value: Option<String>, default: String) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn list_or(items: Vec<String>, default: Vec<String>) -> Vec<String> {
    let items: Vec<String> = items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() { default } else { items }
}

fn status_for(failures: &[SourceFailure]) -> &'static str {
    if failures.is_empty() { "success" } else { "partial" }
}

/// GET /api/analysis - Analyze every configured source.
pub async fn product_analysis(State(state): State<SharedState>) -> Result<Json<Value>, ApiError> {
    let result = state.orchestrator.run_product_analysis(None).await?;
    let analysis = &result.report.analysis;

    Ok(Json(json!({
        "status": status_for(&result.failures),
        "sources": result.report.sources,
        "analysis": {
            "goals": analysis.goals,
            "constraints": analysis.constraints,
            "edge_cases": analysis.edge_cases,
            "follow_up_questions": analysis.follow_up_questions,
            "impact_analysis": analysis.impact_notes,
            "recommendations": analysis.recommendations,
        },
        "failures": result.failures,
        "generated_at": generated_at(),
    })))
}

/// POST /api/prd-generation - Analyze, then generate a PRD and Gherkin
/// scenarios. An empty body analyzes the configured sources alone.
pub async fn prd_generation(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let brief = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let request: BriefRequest = serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid brief: {}", e)))?;
        Some(request.into_brief())
    };

    let result = state
        .orchestrator
        .run_product_analysis(brief.as_ref())
        .await?;
    let analysis = &result.report.analysis;
    let docs = state
        .orchestrator
        .run_prd_generation(analysis, result.prd_context.as_ref())
        .await?;

    Ok(Json(json!({
        "status": status_for(&result.failures),
        "documentation": {
            "title": docs.prd_document.title,
            "prd": docs.prd,
            "gherkin": docs.gherkin,
        },
        "analysis_summary": {
            "goals_count": analysis.goals.len(),
            "constraints_count": analysis.constraints.len(),
            "edge_cases_count": analysis.edge_cases.len(),
            "recommendations_count": analysis.recommendations.len(),
        },
        "failures": result.failures,
        "generated_at": generated_at(),
    })))
}

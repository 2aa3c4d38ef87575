// ABOUTME: Route definitions for the prdforge HTTP API.
// ABOUTME: Assembles all API routes into a single Axum Router with shared state and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;

/// Build the complete Axum router with all routes and shared state.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/github-report/{days}", get(api::github::github_report))
        .route("/api/analysis", get(api::analysis::product_analysis))
        .route("/api/prd-generation", post(api::analysis::prd_generation))
        .route(
            "/api/complete-workflow/{days}",
            get(api::workflow::complete_workflow),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "generated_at": api::generated_at(),
    }))
}

// ABOUTME: Shared application state for the prdforge HTTP server.
// ABOUTME: Holds the orchestrator every handler calls and the optional artifact directory.

use std::path::PathBuf;
use std::sync::Arc;

use prdforge_agent::Orchestrator;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub orchestrator: Orchestrator,
    /// When set, complete workflow runs write their artifacts here.
    pub save_dir: Option<PathBuf>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            save_dir: None,
        }
    }

    pub fn with_save_dir(mut self, dir: PathBuf) -> Self {
        self.save_dir = Some(dir);
        self
    }
}

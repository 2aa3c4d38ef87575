// ABOUTME: Workflow state machine records: stages, transitions, attributable issues and the run report.
// ABOUTME: The orchestrator drives a WorkflowReport through Idle, Fetching, Analyzing, Generating to Done or Failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

use crate::model::{AnalysisResult, GeneratedDocs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Idle,
    Fetching,
    Analyzing,
    Generating,
    Done,
    Failed,
}

impl WorkflowStage {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStage::Idle => "idle",
            WorkflowStage::Fetching => "fetching",
            WorkflowStage::Analyzing => "analyzing",
            WorkflowStage::Generating => "generating",
            WorkflowStage::Done => "done",
            WorkflowStage::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStage::Done | WorkflowStage::Failed)
    }

    /// Stages only move forward one step at a time; any running stage may fail.
    pub fn can_transition_to(&self, next: WorkflowStage) -> bool {
        use WorkflowStage::*;
        matches!(
            (self, next),
            (Idle, Fetching)
                | (Fetching, Analyzing)
                | (Analyzing, Generating)
                | (Generating, Done)
                | (Fetching | Analyzing | Generating, Failed)
        )
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Success,
    Partial,
    Failed,
}

impl WorkflowStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowStatus::Success => "success",
            WorkflowStatus::Partial => "partial",
            WorkflowStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: WorkflowStage,
    pub to: WorkflowStage,
    pub at: DateTime<Utc>,
}

/// A non-fatal problem attributed to the component that caused it,
/// e.g. `trello` during fetching or `github_report` during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowIssue {
    pub stage: WorkflowStage,
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageFailure {
    pub stage: WorkflowStage,
    pub error: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid workflow transition from {from} to {to}")]
pub struct TransitionError {
    pub from: WorkflowStage,
    pub to: WorkflowStage,
}

/// Everything a complete workflow run produced, including how far it got.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowReport {
    pub run_id: Ulid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stage: WorkflowStage,
    pub status: Option<WorkflowStatus>,
    pub transitions: Vec<StageTransition>,
    /// Sources whose data made it into the analysis.
    pub sources: Vec<String>,
    pub github_report: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub docs: Option<GeneratedDocs>,
    pub issues: Vec<WorkflowIssue>,
    pub failure: Option<StageFailure>,
}

impl Default for WorkflowReport {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkflowReport {
    pub fn new() -> Self {
        Self {
            run_id: Ulid::new(),
            started_at: Utc::now(),
            finished_at: None,
            stage: WorkflowStage::Idle,
            status: None,
            transitions: Vec::new(),
            sources: Vec::new(),
            github_report: None,
            analysis: None,
            docs: None,
            issues: Vec::new(),
            failure: None,
        }
    }

    /// Move to `next`, recording the transition.
    pub fn advance(&mut self, next: WorkflowStage) -> Result<(), TransitionError> {
        if !self.stage.can_transition_to(next) {
            return Err(TransitionError {
                from: self.stage,
                to: next,
            });
        }
        self.transitions.push(StageTransition {
            from: self.stage,
            to: next,
            at: Utc::now(),
        });
        self.stage = next;
        if next.is_terminal() {
            self.finished_at = Some(Utc::now());
            self.status = Some(self.compute_status());
        }
        Ok(())
    }

    /// Record a non-fatal issue against the current stage.
    pub fn record_issue(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.issues.push(WorkflowIssue {
            stage: self.stage,
            source: source.into(),
            message: message.into(),
        });
    }

    /// Fail the current stage with `error`.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        let failure = StageFailure {
            stage: self.stage,
            error: error.into(),
        };
        self.advance(WorkflowStage::Failed)?;
        self.failure = Some(failure);
        Ok(())
    }

    fn compute_status(&self) -> WorkflowStatus {
        match self.stage {
            WorkflowStage::Failed => WorkflowStatus::Failed,
            _ if self.issues.is_empty() => WorkflowStatus::Success,
            _ => WorkflowStatus::Partial,
        }
    }

    /// Stages visited, in order, starting from Idle.
    pub fn path(&self) -> Vec<WorkflowStage> {
        let mut path = vec![WorkflowStage::Idle];
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }
}

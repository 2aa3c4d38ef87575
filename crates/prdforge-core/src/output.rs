// ABOUTME: Writes workflow artifacts (GitHub report, analysis, PRD, Gherkin) to the output directory.
// ABOUTME: File names carry the run timestamp so repeated runs never overwrite each other.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use thiserror::Error;

use crate::render::{RenderError, render_analysis};
use crate::workflow::WorkflowReport;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `%Y%m%d_%H%M%S` in local time, used in artifact file names.
pub fn timestamp_slug(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub fn save_artifact(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| OutputError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "saved artifact");
    Ok(path)
}

/// Save every artifact the run produced. Artifacts that do not exist are
/// skipped. Returns the written paths in a fixed order.
pub fn save_results(dir: &Path, report: &WorkflowReport) -> Result<Vec<PathBuf>, OutputError> {
    let ts = timestamp_slug(report.started_at);
    let mut written = Vec::new();

    if let Some(ref github_report) = report.github_report {
        written.push(save_artifact(
            dir,
            &format!("github_report_{}.md", ts),
            github_report,
        )?);
    }

    if let Some(ref analysis) = report.analysis {
        written.push(save_artifact(
            dir,
            &format!("analysis_{}.md", ts),
            &render_analysis(analysis)?,
        )?);
    }

    if let Some(ref docs) = report.docs {
        written.push(save_artifact(dir, &format!("prd_{}.md", ts), &docs.prd)?);
        written.push(save_artifact(
            dir,
            &format!("gherkin_{}.feature", ts),
            &docs.gherkin,
        )?);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gherkin::{GherkinFeature, GherkinScenario, render_gherkin};
    use crate::model::{AnalysisResult, GeneratedDocs, PrdDocument};
    use chrono::TimeZone;

    fn docs() -> GeneratedDocs {
        let features = vec![GherkinFeature {
            name: "Login".into(),
            background: None,
            scenarios: vec![GherkinScenario {
                name: "Works".into(),
                steps: vec!["Given a user".into()],
            }],
        }];
        GeneratedDocs {
            prd: "# Product Requirements Document\n".into(),
            gherkin: render_gherkin(&features),
            prd_document: PrdDocument {
                title: "T".into(),
                overview: String::new(),
                objectives: vec![],
                success_metrics: vec![],
                user_stories: vec![],
                functional_requirements: vec![],
                non_functional_requirements: vec![],
                constraints: vec![],
                assumptions: vec![],
                risks: vec![],
                timeline: String::new(),
                resources: vec![],
                generated_on: "2026-01-01 00:00:00".into(),
            },
            features,
        }
    }

    #[test]
    fn saves_only_existing_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = WorkflowReport::new();
        report.analysis = Some(AnalysisResult {
            goals: vec!["Ship it".into()],
            ..Default::default()
        });

        let written = save_results(dir.path(), &report).unwrap();
        assert_eq!(written.len(), 1);
        let name = written[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("analysis_") && name.ends_with(".md"), "{}", name);
        let contents = fs::read_to_string(&written[0]).unwrap();
        assert!(contents.contains("- Ship it"));
    }

    #[test]
    fn saves_full_run_with_shared_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let mut report = WorkflowReport::new();
        report.github_report = Some("# Report\n".into());
        report.analysis = Some(AnalysisResult::default());
        report.docs = Some(docs());

        let written = save_results(&out, &report).unwrap();
        let ts = timestamp_slug(report.started_at);
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                format!("github_report_{}.md", ts),
                format!("analysis_{}.md", ts),
                format!("prd_{}.md", ts),
                format!("gherkin_{}.feature", ts),
            ]
        );
        let feature = fs::read_to_string(out.join(format!("gherkin_{}.feature", ts))).unwrap();
        assert!(feature.starts_with("Feature: Login"));
    }

    #[test]
    fn timestamp_slug_shape() {
        let at = Utc.with_ymd_and_hms(2026, 5, 17, 8, 30, 0).unwrap();
        let slug = timestamp_slug(at);
        assert_eq!(slug.len(), 15);
        assert_eq!(&slug[8..9], "_");
        assert!(slug.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unwritable_directory_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let err = save_artifact(&blocker, "a.md", "x").unwrap_err();
        assert!(err.to_string().contains("file"), "{}", err);
    }
}

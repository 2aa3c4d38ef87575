// ABOUTME: Defines the analysis, source-data, brief and PRD records shared by every prdforge crate.
// ABOUTME: All records are plain serde data; parsing and rendering live in sibling modules.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured findings extracted from the synthesizer's free-text answer.
/// Fields are never absent: anything the parser could not find is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub goals: Vec<String>,
    pub constraints: Vec<String>,
    pub edge_cases: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub recommendations: Vec<String>,
    pub impact_notes: String,
}

impl AnalysisResult {
    /// True when the parser found nothing at all.
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
            && self.constraints.is_empty()
            && self.edge_cases.is_empty()
            && self.follow_up_questions.is_empty()
            && self.recommendations.is_empty()
            && self.impact_notes.is_empty()
    }
}

/// Raw data gathered from every enabled source, keyed by source name.
///
/// A `BTreeMap` keeps prompt construction deterministic regardless of the
/// order fetchers ran in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSourceData {
    sources: BTreeMap<String, Value>,
}

impl RawSourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the payload for a source.
    pub fn insert(&mut self, source: impl Into<String>, payload: Value) {
        self.sources.insert(source.into(), payload);
    }

    pub fn get(&self, source: &str) -> Option<&Value> {
        self.sources.get(source)
    }

    pub fn contains(&self, source: &str) -> bool {
        self.sources.contains_key(source)
    }

    /// Source names in sorted order.
    pub fn source_names(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Pretty JSON rendering used when embedding the data into prompts.
    pub fn to_prompt_json(&self) -> String {
        serde_json::to_string_pretty(&self.sources).unwrap_or_else(|_| "{}".to_string())
    }

    /// Built-in data used when no source is configured and no brief was given.
    pub fn sample() -> Self {
        let mut data = Self::new();
        data.insert(
            "sample",
            serde_json::json!({
                "source": "sample_data",
                "description": "Sample product analysis based on common software development patterns",
                "features": ["User authentication", "Data management", "API integration", "User interface"],
                "technologies": ["Rust", "Web framework", "Database", "Frontend"],
                "goals": ["Improve user experience", "Increase performance", "Add new features"]
            }),
        );
        data
    }
}

/// Product requirements supplied by a person, either through the
/// interactive menu, CLI flags, or the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBrief {
    pub product_name: String,
    pub description: String,
    pub target_users: String,
    pub business_goals: Vec<String>,
    pub technical_stack: Vec<String>,
    pub constraints: Vec<String>,
}

impl Default for ProductBrief {
    fn default() -> Self {
        Self {
            product_name: "New Product Feature".to_string(),
            description: "Product feature to be analyzed".to_string(),
            target_users: "General users".to_string(),
            business_goals: vec!["Improve user experience".to_string()],
            technical_stack: vec!["Web application".to_string()],
            constraints: vec!["Budget limitations".to_string()],
        }
    }
}

impl ProductBrief {
    /// Build a brief from raw answers. Blank answers fall back to the
    /// defaults; list answers are comma separated.
    pub fn from_answers(
        product_name: &str,
        description: &str,
        target_users: &str,
        business_goals: &str,
        technical_stack: &str,
        constraints: &str,
    ) -> Self {
        let defaults = Self::default();
        Self {
            product_name: text_or(product_name, defaults.product_name),
            description: text_or(description, defaults.description),
            target_users: text_or(target_users, defaults.target_users),
            business_goals: list_or(business_goals, defaults.business_goals),
            technical_stack: list_or(technical_stack, defaults.technical_stack),
            constraints: list_or(constraints, defaults.constraints),
        }
    }

    /// Payload stored under `user_input` in [`RawSourceData`].
    pub fn to_source_value(&self, captured_at: DateTime<Local>) -> Value {
        serde_json::json!({
            "source": "user_requirements",
            "product_name": self.product_name,
            "description": self.description,
            "target_users": self.target_users,
            "business_goals": self.business_goals,
            "technical_stack": self.technical_stack,
            "constraints": self.constraints,
            "timestamp": captured_at.to_rfc3339(),
        })
    }
}

fn text_or(answer: &str, default: String) -> String {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed.to_string()
    }
}

/// Split a comma-separated answer, dropping empty entries.
pub fn split_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn list_or(answer: &str, default: Vec<String>) -> Vec<String> {
    let items = split_list(answer);
    if items.is_empty() { default } else { items }
}

/// A product requirements document assembled from the PRD writer's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrdDocument {
    pub title: String,
    pub overview: String,
    pub objectives: Vec<String>,
    pub success_metrics: Vec<String>,
    pub user_stories: Vec<String>,
    pub functional_requirements: Vec<String>,
    pub non_functional_requirements: Vec<String>,
    pub constraints: Vec<String>,
    pub assumptions: Vec<String>,
    pub risks: Vec<String>,
    pub timeline: String,
    pub resources: Vec<String>,
    /// Captured when the document is built so rendering stays deterministic.
    pub generated_on: String,
}

/// Format used for `PrdDocument::generated_on`.
pub const GENERATED_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendered documentation produced by the PRD agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocs {
    pub prd: String,
    pub gherkin: String,
    pub prd_document: PrdDocument,
    pub features: Vec<crate::gherkin::GherkinFeature>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answers_take_defaults() {
        let brief = ProductBrief::from_answers("", "  ", "", "", "", "");
        assert_eq!(brief, ProductBrief::default());
    }

    #[test]
    fn list_answers_are_comma_split_and_trimmed() {
        let brief = ProductBrief::from_answers(
            "Dashboard",
            "Team metrics",
            "managers",
            " faster reviews , fewer bugs,, ",
            "Rust, Postgres",
            "two engineers",
        );
        assert_eq!(brief.product_name, "Dashboard");
        assert_eq!(brief.business_goals, vec!["faster reviews", "fewer bugs"]);
        assert_eq!(brief.technical_stack, vec!["Rust", "Postgres"]);
        assert_eq!(brief.constraints, vec!["two engineers"]);
    }

    #[test]
    fn raw_source_data_orders_sources() {
        let mut data = RawSourceData::new();
        data.insert("trello", serde_json::json!({"cards": []}));
        data.insert("github", serde_json::json!({"commits": []}));
        assert_eq!(data.source_names(), vec!["github", "trello"]);
        assert!(data.contains("github"));
        assert_eq!(data.len(), 2);

        let json = data.to_prompt_json();
        let github_at = json.find("github").unwrap();
        let trello_at = json.find("trello").unwrap();
        assert!(github_at < trello_at);
    }

    #[test]
    fn sample_data_is_labelled() {
        let data = RawSourceData::sample();
        assert_eq!(data.source_names(), vec!["sample"]);
    }

    #[test]
    fn default_analysis_is_empty() {
        assert!(AnalysisResult::default().is_empty());
        let result = AnalysisResult {
            impact_notes: "High".to_string(),
            ..Default::default()
        };
        assert!(!result.is_empty());
    }
}

// ABOUTME: Gherkin feature records plus parsing from QA-engineer answers and `.feature` rendering.
// ABOUTME: Also derives fallback features from an AnalysisResult when an answer holds no scenarios.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::format::preview;
use crate::model::AnalysisResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GherkinScenario {
    pub name: String,
    /// Full step lines including their keyword, e.g. `Given a user`.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GherkinFeature {
    pub name: String,
    pub background: Option<String>,
    pub scenarios: Vec<GherkinScenario>,
}

const STEP_KEYWORDS: [&str; 5] = ["Given ", "When ", "Then ", "And ", "But "];

/// Parse `Feature:` / `Background:` / `Scenario:` blocks out of free text.
///
/// Bullet markers, backticks and code fences around lines are tolerated.
/// Features that end up without scenarios are dropped.
pub fn parse_gherkin(response: &str) -> Vec<GherkinFeature> {
    let mut features = Vec::new();
    let mut feature: Option<GherkinFeature> = None;
    let mut scenario: Option<GherkinScenario> = None;

    for raw in response.lines() {
        let line = raw
            .trim()
            .trim_start_matches(['-', '*', '•'])
            .trim()
            .trim_matches('`')
            .trim();

        if let Some(name) = line.strip_prefix("Feature:") {
            if let Some(mut done) = feature.take() {
                done.scenarios.extend(scenario.take());
                push_feature(&mut features, done);
            }
            scenario = None;
            feature = Some(GherkinFeature {
                name: name.trim().to_string(),
                background: None,
                scenarios: Vec::new(),
            });
        } else if let Some(background) = line.strip_prefix("Background:") {
            if let Some(current) = feature.as_mut() {
                let background = background.trim();
                if !background.is_empty() {
                    current.background = Some(background.to_string());
                }
            }
        } else if let Some(name) = line
            .strip_prefix("Scenario Outline:")
            .or_else(|| line.strip_prefix("Scenario:"))
        {
            if let (Some(current), Some(done)) = (feature.as_mut(), scenario.take()) {
                current.scenarios.push(done);
            }
            scenario = Some(GherkinScenario {
                name: name.trim().to_string(),
                steps: Vec::new(),
            });
        } else if STEP_KEYWORDS.iter().any(|kw| line.starts_with(kw)) {
            if let Some(current) = scenario.as_mut() {
                current.steps.push(line.to_string());
            } else if let Some(current) = feature.as_mut() {
                // Steps before the first scenario belong to the background.
                if current.background.is_none() {
                    current.background = Some(line.to_string());
                }
            }
        }
    }

    if let Some(mut done) = feature.take() {
        done.scenarios.extend(scenario.take());
        push_feature(&mut features, done);
    }

    features
}

fn push_feature(features: &mut Vec<GherkinFeature>, feature: GherkinFeature) {
    if !feature.scenarios.is_empty() {
        features.push(feature);
    }
}

/// Render features as `.feature` text. Deterministic for equal input.
pub fn render_gherkin(features: &[GherkinFeature]) -> String {
    let mut out = String::new();

    for feature in features {
        writeln!(out, "Feature: {}", feature.name).unwrap();

        if let Some(ref background) = feature.background {
            writeln!(out, "  Background: {}", background).unwrap();
        }

        for scenario in &feature.scenarios {
            writeln!(out).unwrap();
            writeln!(out, "  Scenario: {}", scenario.name).unwrap();
            for step in &scenario.steps {
                writeln!(out, "    {}", step).unwrap();
            }
        }

        writeln!(out).unwrap();
    }

    out
}

/// Features derived from the analysis: the top three goals, top two
/// constraints and top two edge cases each become a scenario.
pub fn fallback_features(analysis: &AnalysisResult) -> Vec<GherkinFeature> {
    if analysis.goals.is_empty() && analysis.constraints.is_empty() && analysis.edge_cases.is_empty()
    {
        return vec![GherkinFeature {
            name: "Core Functionality".to_string(),
            background: Some("Given the system is properly configured".to_string()),
            scenarios: vec![GherkinScenario {
                name: "Successful operation".to_string(),
                steps: vec![
                    "Given I am a valid user".to_string(),
                    "When I perform the main action".to_string(),
                    "Then I should see the expected result".to_string(),
                ],
            }],
        }];
    }

    let mut features = Vec::new();

    if !analysis.goals.is_empty() {
        features.push(GherkinFeature {
            name: "Goal Achievement".to_string(),
            background: Some("Given the application is running and accessible".to_string()),
            scenarios: analysis
                .goals
                .iter()
                .take(3)
                .map(|goal| {
                    let goal = goal.to_lowercase();
                    GherkinScenario {
                        name: format!("Achieve {}", goal),
                        steps: vec![
                            "Given I am an authenticated user".to_string(),
                            format!("When I work towards {}", goal),
                            "Then I should see progress indicators".to_string(),
                            "And the system should track my achievements".to_string(),
                        ],
                    }
                })
                .collect(),
        });
    }

    if !analysis.constraints.is_empty() {
        features.push(GherkinFeature {
            name: "Constraint Handling".to_string(),
            background: Some("Given the system has defined operational limits".to_string()),
            scenarios: analysis
                .constraints
                .iter()
                .take(2)
                .map(|constraint| {
                    let short = preview(constraint, 50);
                    GherkinScenario {
                        name: format!("Handle constraint: {}", short),
                        steps: vec![
                            "Given I encounter a system constraint".to_string(),
                            format!("When the system faces: {}", short),
                            "Then appropriate limitations should be communicated".to_string(),
                            "And alternative solutions should be suggested".to_string(),
                        ],
                    }
                })
                .collect(),
        });
    }

    if !analysis.edge_cases.is_empty() {
        features.push(GherkinFeature {
            name: "Edge Case Management".to_string(),
            background: Some("Given the system encounters unexpected scenarios".to_string()),
            scenarios: analysis
                .edge_cases
                .iter()
                .take(2)
                .map(|edge_case| {
                    let short = preview(edge_case, 50);
                    GherkinScenario {
                        name: format!("Handle edge case: {}", short),
                        steps: vec![
                            "Given I encounter an unusual situation".to_string(),
                            format!("When {}", short),
                            "Then the system should handle it gracefully".to_string(),
                            "And provide appropriate user feedback".to_string(),
                        ],
                    }
                })
                .collect(),
        });
    }

    features
}

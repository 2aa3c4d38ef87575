// ABOUTME: Heuristic extraction of structured fields from free-text LLM answers.
// ABOUTME: Locates a section header matching a field name and collects the bullet items beneath it.

use crate::model::{AnalysisResult, GENERATED_ON_FORMAT, PrdDocument};

/// Classification of a single trimmed response line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Header(String),
    Item(&'a str),
    Text(&'a str),
    Blank,
}

/// Extract the bullet items listed under the first header matching `field`.
///
/// Matching is case-insensitive and ignores markdown markup, numbering,
/// underscores and hyphens. A header equal to the field wins over one that
/// only contains it. Returns an empty list when no header matches.
pub fn extract_section(response: &str, field: &str) -> Vec<String> {
    section_lines(response, field)
        .into_iter()
        .filter_map(|line| match line {
            Line::Item(item) => Some(clean_item(item)),
            _ => None,
        })
        .filter(|item| !item.is_empty())
        .collect()
}

/// Extract every non-empty line of the first section matching `field`,
/// joined with newlines. Bullet items keep their marker.
pub fn extract_text(response: &str, field: &str) -> String {
    section_lines(response, field)
        .into_iter()
        .filter_map(|line| match line {
            Line::Item(item) => Some(format!("- {}", clean_item(item))),
            Line::Text(text) => Some(text.to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a synthesizer answer into an [`AnalysisResult`]. Never fails.
pub fn parse_analysis(response: &str) -> AnalysisResult {
    AnalysisResult {
        goals: extract_section(response, "goals"),
        constraints: extract_section(response, "constraints"),
        edge_cases: extract_section(response, "edge cases"),
        follow_up_questions: extract_section(response, "follow up questions"),
        recommendations: extract_section(response, "recommendations"),
        impact_notes: extract_text(response, "impact"),
    }
}

const DEFAULT_PRD_TITLE: &str = "Product Requirements Document";

/// Parse a PRD writer answer, filling gaps from the analysis and fixed defaults.
///
/// Constraints always come from the analysis. `generated_on` is stamped
/// here so rendering the returned document is deterministic.
pub fn parse_prd(
    response: &str,
    analysis: &AnalysisResult,
    generated_on: chrono::DateTime<chrono::Local>,
) -> PrdDocument {
    let overview = extract_text(response, "overview")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    let timeline = extract_text(response, "timeline")
        .lines()
        .last()
        .map(|line| line.trim_start_matches("- ").to_string())
        .unwrap_or_default();

    PrdDocument {
        title: extract_title(response)
            .or_else(|| extract_section_title(response))
            .unwrap_or_else(|| DEFAULT_PRD_TITLE.to_string()),
        overview: non_empty_or(overview, "Product overview to be defined"),
        objectives: or_list(extract_section(response, "objectives"), || {
            analysis.goals.clone()
        }),
        success_metrics: or_defaults(
            extract_section(response, "success metrics"),
            &["User engagement metrics", "Performance benchmarks"],
        ),
        user_stories: or_defaults(
            extract_section(response, "user stories"),
            &["As a user, I want to achieve my goals efficiently"],
        ),
        functional_requirements: or_defaults(
            extract_section(response, "functional requirements"),
            &["Core functionality implementation"],
        ),
        non_functional_requirements: or_defaults(
            extract_section(response, "non functional requirements"),
            &["Performance", "Security", "Scalability"],
        ),
        constraints: analysis.constraints.clone(),
        assumptions: or_defaults(
            extract_section(response, "assumptions"),
            &["Standard development practices"],
        ),
        risks: or_list(extract_section(response, "risks"), || {
            analysis.edge_cases.clone()
        }),
        timeline: non_empty_or(timeline, "To be determined based on resource allocation"),
        resources: or_defaults(
            extract_section(response, "resources"),
            &["Development team", "QA resources", "Infrastructure"],
        ),
        generated_on: generated_on.format(GENERATED_ON_FORMAT).to_string(),
    }
}

/// A `# ` heading that mentions "title" names the product, e.g.
/// `# Title: Smart Inbox`.
fn extract_title(response: &str) -> Option<String> {
    response.lines().map(str::trim).find_map(|line| {
        let rest = line.strip_prefix("# ")?;
        let lower = rest.to_ascii_lowercase();
        let at = lower.find("title")?;
        let after = rest[at + "title".len()..]
            .trim_start_matches(|c: char| c == ':' || c == '*' || c.is_whitespace())
            .trim();
        if after.is_empty() {
            None
        } else {
            Some(after.to_string())
        }
    })
}

/// First line under a `Product Title` style section.
fn extract_section_title(response: &str) -> Option<String> {
    extract_text(response, "product title")
        .lines()
        .map(|line| line.trim_start_matches("- ").trim().to_string())
        .find(|line| !line.is_empty())
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

fn or_list(items: Vec<String>, fallback: impl FnOnce() -> Vec<String>) -> Vec<String> {
    if items.is_empty() { fallback() } else { items }
}

fn or_defaults(items: Vec<String>, defaults: &[&str]) -> Vec<String> {
    or_list(items, || defaults.iter().map(|d| d.to_string()).collect())
}

/// Lines belonging to the first section whose header matches `field`.
fn section_lines<'a>(response: &'a str, field: &str) -> Vec<Line<'a>> {
    let wanted = normalize(field);
    if wanted.is_empty() {
        return Vec::new();
    }

    let lines: Vec<Line<'a>> = response.lines().map(|raw| classify(raw, &wanted)).collect();
    let start = find_header(&lines, &wanted, MatchKind::Exact)
        .or_else(|| find_header(&lines, &wanted, MatchKind::Contains));

    let Some(start) = start else {
        return Vec::new();
    };

    lines[start + 1..]
        .iter()
        .take_while(|line| !matches!(line, Line::Header(_)))
        .cloned()
        .collect()
}

#[derive(Clone, Copy)]
enum MatchKind {
    Exact,
    Contains,
}

fn find_header(lines: &[Line<'_>], wanted: &str, kind: MatchKind) -> Option<usize> {
    lines.iter().position(|line| match line {
        Line::Header(title) => match kind {
            MatchKind::Exact => title == wanted,
            MatchKind::Contains => contains_phrase(title, wanted),
        },
        _ => false,
    })
}

/// Word-level containment. A match directly preceded by "non" is rejected
/// so "functional requirements" never picks up "non functional requirements".
fn contains_phrase(title: &str, wanted: &str) -> bool {
    let words: Vec<&str> = title.split_whitespace().collect();
    let needle: Vec<&str> = wanted.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    (0..=words.len() - needle.len()).any(|at| {
        words[at..at + needle.len()] == needle[..] && (at == 0 || words[at - 1] != "non")
    })
}

/// Section titles every answer format uses. A plain `Label:` line only
/// starts a section when it names one of these or the field being looked up.
const KNOWN_SECTIONS: &[&str] = &[
    "goals",
    "constraints",
    "edge cases",
    "follow up questions",
    "impact",
    "impact analysis",
    "recommendations",
    "title",
    "product title",
    "overview",
    "objectives",
    "success metrics",
    "user stories",
    "functional requirements",
    "non functional requirements",
    "assumptions",
    "risks",
    "risks and mitigation",
    "timeline",
    "resources",
    "resources required",
];

fn classify<'a>(raw: &'a str, wanted: &str) -> Line<'a> {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }

    if line.starts_with('#') {
        return Line::Header(normalize(line.trim_start_matches('#')));
    }

    if let Some(rest) = strip_bullet(line) {
        return Line::Item(rest);
    }

    if let Some(rest) = strip_number(line) {
        if is_emphasized(rest) || is_label(rest, wanted) {
            return Line::Header(normalize(rest));
        }
        // "1. Technical:" groups the items that follow; it is not one of them.
        if unbold(rest).ends_with(':') {
            return Line::Text(line);
        }
        return Line::Item(rest);
    }

    if is_emphasized(line) || is_label(line, wanted) {
        return Line::Header(normalize(line));
    }

    Line::Text(line)
}

/// `GOALS:` or `Edge Cases:`, but not a lead-in such as "The main goals are:".
fn is_label(line: &str, wanted: &str) -> bool {
    let text = unbold(line);
    let Some(body) = text.strip_suffix(':') else {
        return false;
    };
    let shouting = body.chars().any(char::is_alphabetic)
        && !body.chars().any(char::is_lowercase);
    let title = normalize(body);
    shouting || title == wanted || KNOWN_SECTIONS.contains(&title.as_str())
}

/// `- item`, `* item`, `+ item`, `• item`
fn strip_bullet(line: &str) -> Option<&str> {
    let mut chars = line.chars();
    let marker = chars.next()?;
    if !matches!(marker, '-' | '*' | '+' | '•') {
        return None;
    }
    let rest = chars.as_str();
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// `1. item` or `2) item`
fn strip_number(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &line[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Whole line wrapped in `**..**` or `__..__`, optionally followed by `:`.
fn is_emphasized(line: &str) -> bool {
    let body = line.trim_end_matches(':').trim_end();
    ["**", "__"].iter().any(|mark| {
        body.len() > 2 * mark.len()
            && body.starts_with(mark)
            && body.ends_with(mark)
            && !body[mark.len()..body.len() - mark.len()].contains(mark)
    })
}

fn unbold(line: &str) -> String {
    line.replace("**", "").replace("__", "").trim().to_string()
}

/// Lowercase, strip markup and punctuation, fold `_`/`-` into spaces and
/// collapse whitespace.
fn normalize(text: &str) -> String {
    let text = strip_number(text.trim()).unwrap_or(text);
    text.chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c if c.is_alphanumeric() || c.is_whitespace() => c,
            _ => ' ',
        })
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip surrounding bold markers from an extracted item.
fn clean_item(item: &str) -> String {
    let item = item.trim();
    let item = item
        .strip_prefix("**")
        .and_then(|inner| inner.strip_suffix("**"))
        .unwrap_or(item);
    item.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    const EXAMPLE: &str = "## Goals\n- A\n- B\n## Constraints\n- C";

    #[test]
    fn extracts_bullets_under_matching_header() {
        assert_eq!(extract_section(EXAMPLE, "Goals"), vec!["A", "B"]);
        assert_eq!(extract_section(EXAMPLE, "Constraints"), vec!["C"]);
    }

    #[test]
    fn missing_header_yields_empty_list() {
        assert!(extract_section(EXAMPLE, "Edge Cases").is_empty());
        assert!(extract_section("", "Goals").is_empty());
        assert!(extract_section("- orphan bullet\n- another", "Goals").is_empty());
    }

    #[test]
    fn header_matching_is_case_insensitive() {
        let text = "### GOALS\n* Ship it\n### constraints:\n* Budget";
        assert_eq!(extract_section(text, "goals"), vec!["Ship it"]);
        assert_eq!(extract_section(text, "CONSTRAINTS"), vec!["Budget"]);
    }

    #[test]
    fn first_duplicate_header_wins() {
        let text = "## Goals\n- first\n## Notes\n- n\n## Goals\n- second";
        assert_eq!(extract_section(text, "Goals"), vec!["first"]);
    }

    #[test]
    fn prose_inside_section_is_skipped() {
        let text = "## Goals\nThese are the goals we found.\n\n- Grow revenue\nMore prose.\n- Cut churn\n## Risks\n- None";
        assert_eq!(extract_section(text, "Goals"), vec!["Grow revenue", "Cut churn"]);
    }

    #[test]
    fn lead_in_sentence_does_not_end_section() {
        let text = "## Goals\nThe main goals are:\n- A\n- B\n## Constraints\n- C";
        assert_eq!(extract_section(text, "Goals"), vec!["A", "B"]);
        assert_eq!(extract_section(text, "Constraints"), vec!["C"]);
    }

    #[test]
    fn numbered_sub_headings_group_items_within_section() {
        let text = "## Constraints\n1. Technical:\n- Limited API\n2. Business:\n- Budget\n## Risks\n- Churn";
        assert_eq!(
            extract_section(text, "Constraints"),
            vec!["Limited API", "Budget"]
        );
        assert_eq!(
            extract_text(text, "Constraints"),
            "1. Technical:\n- Limited API\n2. Business:\n- Budget"
        );
    }

    #[test]
    fn colon_sentence_after_bold_header_is_prose() {
        let text = "**GOALS:**\nBased on the analysis, we recommend:\n- Ship faster\n- Hire support\nCONSTRAINTS:\n- Budget";
        assert_eq!(extract_section(text, "goals"), vec!["Ship faster", "Hire support"]);
        assert_eq!(extract_section(text, "constraints"), vec!["Budget"]);
    }

    #[test]
    fn plain_label_headers_need_a_section_name() {
        let text = "Goals:\n- Grow\nWhat we heard:\n- Retain\nEdge Cases:\n- Offline\nPricing notes:\n- Cheap";
        assert_eq!(extract_section(text, "goals"), vec!["Grow", "Retain"]);
        assert_eq!(extract_section(text, "edge cases"), vec!["Offline", "Cheap"]);
        assert_eq!(extract_section(text, "pricing notes"), vec!["Cheap"]);
    }

    #[test]
    fn recognizes_numbered_and_bold_headers() {
        let text = "1. GOALS:\n- Faster onboarding\n2. **Edge Cases**\n- Offline users\n**FOLLOW_UP_QUESTIONS:**\n- Who pays?\nRECOMMENDATIONS:\n1. Run a pilot\n2) Interview users";
        assert_eq!(extract_section(text, "goals"), vec!["Faster onboarding"]);
        assert_eq!(extract_section(text, "edge cases"), vec!["Offline users"]);
        assert_eq!(extract_section(text, "follow up questions"), vec!["Who pays?"]);
        assert_eq!(
            extract_section(text, "recommendations"),
            vec!["Run a pilot", "Interview users"]
        );
    }

    #[test]
    fn exact_header_preferred_over_containing_header() {
        let text = "## Questions about goals\n- q1\n## Goals\n- g1";
        assert_eq!(extract_section(text, "goals"), vec!["g1"]);
        assert_eq!(extract_section("## Business goals\n- grow", "goals"), vec!["grow"]);
    }

    #[test]
    fn functional_requirements_skip_non_functional_header() {
        let text = "## Non-Functional Requirements\n- Fast\n## Other\n- x";
        assert!(extract_section(text, "functional requirements").is_empty());
        assert_eq!(
            extract_section(text, "non functional requirements"),
            vec!["Fast"]
        );
    }

    #[test]
    fn bullet_markers_are_stripped() {
        let text = "## Goals\n• bullet dot\n+ plus\n- **bold item**\n-not a bullet";
        assert_eq!(
            extract_section(text, "Goals"),
            vec!["bullet dot", "plus", "bold item"]
        );
    }

    #[test]
    fn extract_text_keeps_prose_and_items() {
        let text = "## Impact Analysis\nGrowth is likely.\n- Revenue: up\n## Recommendations\n- x";
        assert_eq!(
            extract_text(text, "impact"),
            "Growth is likely.\n- Revenue: up"
        );
        assert_eq!(extract_text(text, "timeline"), "");
    }

    #[test]
    fn parse_analysis_fills_every_field() {
        let text = "\
## Goals
- Improve onboarding
## Constraints
- Two engineers
## Edge Cases
- Offline mode
## Follow-up Questions
- What is the budget?
## Impact Analysis
High growth potential.
## Recommendations
- Start with a pilot
";
        let result = parse_analysis(text);
        assert_eq!(result.goals, vec!["Improve onboarding"]);
        assert_eq!(result.constraints, vec!["Two engineers"]);
        assert_eq!(result.edge_cases, vec!["Offline mode"]);
        assert_eq!(result.follow_up_questions, vec!["What is the budget?"]);
        assert_eq!(result.recommendations, vec!["Start with a pilot"]);
        assert_eq!(result.impact_notes, "High growth potential.");
    }

    #[test]
    fn parse_analysis_of_garbage_is_empty() {
        assert!(parse_analysis("I cannot help with that.").is_empty());
    }

    fn fixed_time() -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn parse_prd_reads_sections() {
        let analysis = AnalysisResult {
            goals: vec!["g".to_string()],
            constraints: vec!["budget".to_string()],
            edge_cases: vec!["e".to_string()],
            ..Default::default()
        };
        let text = "\
# Title: Smart Inbox
## Overview
An inbox that sorts itself.
It learns from the user.
## Objectives
- Reduce triage time
## User Stories
- As a user, I want fewer emails
## Functional Requirements
- Auto-labels
## Non-Functional Requirements
- p99 under 200ms
## Timeline
Q3 2026
";
        let prd = parse_prd(text, &analysis, fixed_time());
        assert_eq!(prd.title, "Smart Inbox");
        assert_eq!(prd.overview, "An inbox that sorts itself. It learns from the user.");
        assert_eq!(prd.objectives, vec!["Reduce triage time"]);
        assert_eq!(prd.user_stories, vec!["As a user, I want fewer emails"]);
        assert_eq!(prd.functional_requirements, vec!["Auto-labels"]);
        assert_eq!(prd.non_functional_requirements, vec!["p99 under 200ms"]);
        assert_eq!(prd.constraints, vec!["budget"]);
        assert_eq!(prd.risks, vec!["e"]);
        assert_eq!(prd.timeline, "Q3 2026");
        assert_eq!(prd.generated_on, "2026-03-04 05:06:07");
    }

    #[test]
    fn parse_prd_falls_back_to_analysis_and_defaults() {
        let analysis = AnalysisResult {
            goals: vec!["Grow".to_string()],
            edge_cases: vec!["Offline".to_string()],
            ..Default::default()
        };
        let prd = parse_prd("nothing useful", &analysis, fixed_time());
        assert_eq!(prd.title, "Product Requirements Document");
        assert_eq!(prd.overview, "Product overview to be defined");
        assert_eq!(prd.objectives, vec!["Grow"]);
        assert_eq!(prd.risks, vec!["Offline"]);
        assert_eq!(prd.non_functional_requirements.len(), 3);
        assert_eq!(prd.timeline, "To be determined based on resource allocation");
    }

    #[test]
    fn parse_prd_reads_title_section() {
        let text = "# Product Requirements Document\n\n## Product Title\nSmart Inbox\n\n## Overview\nSorted mail.\n";
        let prd = parse_prd(text, &AnalysisResult::default(), fixed_time());
        assert_eq!(prd.title, "Smart Inbox");
        assert_eq!(prd.overview, "Sorted mail.");
    }
}

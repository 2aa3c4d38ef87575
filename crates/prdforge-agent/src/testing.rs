// ABOUTME: Test utilities for prdforge-agent: a scripted LLM runtime and stub data sources.
// ABOUTME: Used across the workspace to drive agents and the orchestrator without network calls.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use prdforge_core::activity::{
    CommitSummary, GitHubSnapshot, IssueSummary, PullRequestSummary, RepositoryStats,
};
use prdforge_sources::{ActivitySource, SourceError, SourceFetcher};

use crate::roles::AgentRole;
use crate::runtime::{CompletionRequest, LlmError, LlmRuntime};

/// Canned analyst answer.
pub const ANALYST_ANSWER: &str = "The product should focus on fast triage for busy users.";

/// Canned synthesizer answer with every section the parser looks for.
pub const SYNTHESIS_ANSWER: &str = "\
## Goals
- Reduce time to triage incoming requests
- Increase weekly active users
## Constraints
- Must run on existing infrastructure
## Edge Cases
- Empty inbox
## Follow-up Questions
- Which teams pilot first?
## Impact Analysis
Growth should improve as onboarding gets simpler.
## Recommendations
- Ship a beta to one team
";

/// Canned PRD writer answer.
pub const PRD_ANSWER: &str = "\
# Title: Smart Triage
## Overview
A triage assistant for support teams.
## Objectives
- Cut first response time in half
## Success Metrics
- Median first response under 1 hour
## User Stories
- As an agent, I want requests grouped by topic
## Functional Requirements
- Group requests by topic
## Non-Functional Requirements
- Responses render within 200ms
## Assumptions
- Teams already use a shared inbox
## Risks and Mitigation
- Misgrouping erodes trust
## Timeline
Six weeks
## Resources Required
- Two engineers
";

/// Canned QA engineer answer.
pub const GHERKIN_ANSWER: &str = "\
Feature: Request grouping
  Scenario: Requests are grouped by topic
    Given an inbox with mixed requests
    When the agent opens the inbox
    Then requests are grouped by topic
";

/// Canned GitHub activity report.
pub const GITHUB_REPORT_ANSWER: &str = "## Executive Summary\nSteady week with two merged fixes.";

enum Rule {
    Role(AgentRole),
    Contains(String),
}

impl Rule {
    fn matches(&self, request: &CompletionRequest) -> bool {
        match self {
            Rule::Role(role) => request.system == role.system_prompt(),
            Rule::Contains(needle) => {
                request.system.contains(needle.as_str()) || request.prompt.contains(needle.as_str())
            }
        }
    }
}

/// An LlmRuntime that answers from a script and records every request.
///
/// Rules are checked in insertion order; the first match wins. Failure
/// rules take precedence over answers.
pub struct StubRuntime {
    answers: Vec<(Rule, String)>,
    failures: Vec<Rule>,
    fail_all: bool,
    default_response: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubRuntime {
    pub fn new(default_response: &str) -> Self {
        Self {
            answers: Vec::new(),
            failures: Vec::new(),
            fail_all: false,
            default_response: default_response.to_owned(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a provider error.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::new("")
        }
    }

    /// A runtime with a sensible canned answer for every role.
    pub fn scripted() -> Self {
        Self::new(ANALYST_ANSWER)
            .answer_role(AgentRole::Synthesizer, SYNTHESIS_ANSWER)
            .answer_role(AgentRole::PrdWriter, PRD_ANSWER)
            .answer_role(AgentRole::QaEngineer, GHERKIN_ANSWER)
            .answer_role(AgentRole::GitHubAnalyst, GITHUB_REPORT_ANSWER)
    }

    pub fn answer_role(mut self, role: AgentRole, response: &str) -> Self {
        self.answers.push((Rule::Role(role), response.to_owned()));
        self
    }

    pub fn answer_containing(mut self, needle: &str, response: &str) -> Self {
        self.answers
            .push((Rule::Contains(needle.to_owned()), response.to_owned()));
        self
    }

    pub fn fail_role(mut self, role: AgentRole) -> Self {
        self.failures.push(Rule::Role(role));
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }

    /// How many requests were framed as `role`.
    pub fn calls_for(&self, role: AgentRole) -> usize {
        let system = role.system_prompt();
        self.requests()
            .iter()
            .filter(|r| r.system == system)
            .count()
    }
}

#[async_trait]
impl LlmRuntime for StubRuntime {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if self.fail_all || self.failures.iter().any(|rule| rule.matches(request)) {
            return Err(LlmError::ProviderError("stub failure".to_owned()));
        }

        Ok(self
            .answers
            .iter()
            .find(|(rule, _)| rule.matches(request))
            .map(|(_, answer)| answer.clone())
            .unwrap_or_else(|| self.default_response.clone()))
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// A SourceFetcher that returns a fixed payload or a fixed failure.
pub struct StubFetcher {
    name: &'static str,
    payload: Result<Value, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn ok(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Ok(payload),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(name: &'static str, message: &str) -> Self {
        Self {
            name,
            payload: Err(message.to_owned()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourceFetcher for StubFetcher {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _days_back: u32) -> Result<Value, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.payload {
            Ok(value) => Ok(value.clone()),
            Err(message) => Err(SourceError::Http(message.clone())),
        }
    }
}

/// An ActivitySource that always returns the same snapshot (with the
/// requested `days_back`) or always fails.
pub struct StubActivity {
    snapshot: Option<GitHubSnapshot>,
    calls: AtomicUsize,
}

impl StubActivity {
    pub fn new(snapshot: GitHubSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            snapshot: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivitySource for StubActivity {
    async fn snapshot(&self, days_back: u32) -> Result<GitHubSnapshot, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.snapshot {
            Some(snapshot) => Ok(GitHubSnapshot {
                days_back,
                ..snapshot.clone()
            }),
            None => Err(SourceError::Server("502 Bad Gateway".to_owned())),
        }
    }

    fn repository(&self) -> String {
        self.snapshot
            .as_ref()
            .map(|s| s.repository.full_name.clone())
            .unwrap_or_else(|| "stub/unavailable".to_owned())
    }
}

/// A small snapshot with two commits, one open PR and one issue.
pub fn sample_snapshot() -> GitHubSnapshot {
    GitHubSnapshot {
        repository: RepositoryStats {
            name: "app".to_owned(),
            full_name: "acme/app".to_owned(),
            description: Some("Support tooling".to_owned()),
            stars: 42,
            forks: 3,
            open_issues: 5,
            language: Some("Rust".to_owned()),
            default_branch: "main".to_owned(),
        },
        days_back: 1,
        commits: vec![
            CommitSummary {
                sha: "a1b2c3d4".to_owned(),
                message: "Fix inbox pagination".to_owned(),
                author: "Dana".to_owned(),
                date: "2026-10-15T09:00:00Z".to_owned(),
                url: "https://github.com/acme/app/commit/a1b2c3d4".to_owned(),
                additions: 12,
                deletions: 4,
                files_changed: 2,
            },
            CommitSummary {
                sha: "e5f6a7b8".to_owned(),
                message: "Add topic grouping".to_owned(),
                author: "Sam".to_owned(),
                date: "2026-10-15T11:00:00Z".to_owned(),
                url: "https://github.com/acme/app/commit/e5f6a7b8".to_owned(),
                additions: 80,
                deletions: 10,
                files_changed: 5,
            },
        ],
        pull_requests: vec![PullRequestSummary {
            number: 17,
            title: "Topic grouping".to_owned(),
            author: "Sam".to_owned(),
            state: "open".to_owned(),
            created_at: "2026-10-14T08:00:00Z".to_owned(),
            url: "https://github.com/acme/app/pull/17".to_owned(),
        }],
        issues: vec![IssueSummary {
            number: 9,
            title: "Inbox is slow".to_owned(),
            body: "Loading takes seconds".to_owned(),
            labels: vec!["performance".to_owned()],
            state: "open".to_owned(),
            created_at: "2026-10-10T08:00:00Z".to_owned(),
        }],
    }
}

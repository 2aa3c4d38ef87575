// ABOUTME: Repository activity records (stats, commits, pull requests, issues) fetched from GitHub.
// ABOUTME: Shared by the GitHub fetcher, the reporter's prompt builder and the activity digest renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub language: Option<String>,
    pub default_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Abbreviated to eight characters.
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: String,
    pub url: String,
    pub additions: u64,
    pub deletions: u64,
    pub files_changed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub state: String,
    pub created_at: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub state: String,
    pub created_at: String,
}

/// Everything the GitHub fetcher learned about a repository for one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubSnapshot {
    pub repository: RepositoryStats,
    pub days_back: u32,
    pub commits: Vec<CommitSummary>,
    pub pull_requests: Vec<PullRequestSummary>,
    pub issues: Vec<IssueSummary>,
}

impl GitHubSnapshot {
    /// True when there is nothing worth reporting on.
    pub fn is_quiet(&self) -> bool {
        self.commits.is_empty() && self.pull_requests.is_empty()
    }

    pub fn total_additions(&self) -> u64 {
        self.commits.iter().map(|c| c.additions).sum()
    }

    pub fn total_deletions(&self) -> u64 {
        self.commits.iter().map(|c| c.deletions).sum()
    }
}

// ABOUTME: GitHub REST fetcher: repository stats, recent commits with line stats, open pull requests and issues.
// ABOUTME: Implements SourceFetcher for analysis input and ActivitySource for the activity reporter.

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use prdforge_core::activity::{
    CommitSummary, GitHubSnapshot, IssueSummary, PullRequestSummary, RepositoryStats,
};
use prdforge_core::config::GitHubSettings;

use crate::error::SourceError;
use crate::http::{build_client, check_status, clip};
use crate::{ActivitySource, SourceFetcher};

/// Commits beyond this many are listed without per-commit line stats.
const COMMIT_DETAIL_LIMIT: usize = 10;
const ISSUE_LIMIT: usize = 50;
const ISSUE_BODY_CHARS: usize = 500;

pub struct GitHubFetcher {
    client: Client,
    settings: GitHubSettings,
}

#[derive(Deserialize)]
struct RepoPayload {
    name: String,
    full_name: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    language: Option<String>,
    #[serde(default)]
    default_branch: String,
}

#[derive(Deserialize)]
struct CommitPayload {
    sha: String,
    #[serde(default)]
    html_url: String,
    commit: CommitInner,
}

#[derive(Deserialize)]
struct CommitInner {
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    name: String,
    date: String,
}

#[derive(Deserialize)]
struct CommitDetailPayload {
    stats: Option<CommitStats>,
    #[serde(default)]
    files: Vec<Value>,
}

#[derive(Deserialize)]
struct CommitStats {
    additions: u64,
    deletions: u64,
}

#[derive(Deserialize)]
struct UserPayload {
    login: String,
}

#[derive(Deserialize)]
struct PullPayload {
    number: u64,
    title: String,
    user: Option<UserPayload>,
    state: String,
    created_at: String,
    #[serde(default)]
    html_url: String,
}

#[derive(Deserialize)]
struct LabelPayload {
    name: String,
}

#[derive(Deserialize)]
struct IssuePayload {
    number: u64,
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    state: String,
    created_at: String,
    pull_request: Option<Value>,
}

impl GitHubFetcher {
    pub fn new(settings: GitHubSettings) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client()?,
            settings,
        })
    }

    fn repo_url(&self, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.owner,
            self.settings.repo,
            suffix
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(&self.settings.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SourceError> {
        let response = request.send().await?;
        let response = check_status(response, "GITHUB_TOKEN").await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("failed to parse JSON: {}", e)))
    }

    pub async fn repository_stats(&self) -> Result<RepositoryStats, SourceError> {
        let repo: RepoPayload = self.get_json(self.get(&self.repo_url(""))).await?;
        Ok(RepositoryStats {
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            language: repo.language,
            default_branch: repo.default_branch,
        })
    }

    /// Commits from the last `days_back` days, newest first. An empty
    /// repository (409 from GitHub) yields no commits rather than an error.
    pub async fn recent_commits(&self, days_back: u32) -> Result<Vec<CommitSummary>, SourceError> {
        let since = (Utc::now() - Duration::days(i64::from(days_back)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let response = self
            .get(&self.repo_url("/commits"))
            .query(&[("since", since.as_str()), ("per_page", "100")])
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            tracing::info!(repo = %self.repository(), "repository is empty, no commits available");
            return Ok(Vec::new());
        }

        let response = check_status(response, "GITHUB_TOKEN").await?;
        let payload: Vec<CommitPayload> = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("failed to parse commits: {}", e)))?;

        let mut commits = Vec::with_capacity(payload.len());
        for (index, item) in payload.into_iter().enumerate() {
            let (author, date) = item
                .commit
                .author
                .map(|a| (a.name, a.date))
                .unwrap_or_else(|| ("unknown".to_string(), String::new()));
            let mut summary = CommitSummary {
                sha: clip(&item.sha, 8),
                message: item.commit.message,
                author,
                date,
                url: item.html_url,
                additions: 0,
                deletions: 0,
                files_changed: 0,
            };

            if index < COMMIT_DETAIL_LIMIT {
                match self.commit_detail(&item.sha).await {
                    Ok(detail) => {
                        if let Some(stats) = detail.stats {
                            summary.additions = stats.additions;
                            summary.deletions = stats.deletions;
                        }
                        summary.files_changed = detail.files.len() as u64;
                    }
                    Err(e) => {
                        tracing::warn!(sha = %summary.sha, error = %e, "could not fetch commit stats");
                    }
                }
            }

            commits.push(summary);
        }

        tracing::info!(count = commits.len(), days_back, "fetched commits");
        Ok(commits)
    }

    async fn commit_detail(&self, sha: &str) -> Result<CommitDetailPayload, SourceError> {
        self.get_json(self.get(&self.repo_url(&format!("/commits/{}", sha))))
            .await
    }

    pub async fn open_pull_requests(&self) -> Result<Vec<PullRequestSummary>, SourceError> {
        let pulls: Vec<PullPayload> = self
            .get_json(
                self.get(&self.repo_url("/pulls"))
                    .query(&[("state", "open"), ("per_page", "50")]),
            )
            .await?;

        Ok(pulls
            .into_iter()
            .map(|pr| PullRequestSummary {
                number: pr.number,
                title: pr.title,
                author: pr.user.map(|u| u.login).unwrap_or_default(),
                state: pr.state,
                created_at: pr.created_at,
                url: pr.html_url,
            })
            .collect())
    }

    /// Most recent issues in any state, excluding pull requests.
    pub async fn recent_issues(&self) -> Result<Vec<IssueSummary>, SourceError> {
        let issues: Vec<IssuePayload> = self
            .get_json(
                self.get(&self.repo_url("/issues"))
                    .query(&[("state", "all"), ("per_page", "50")]),
            )
            .await?;

        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .take(ISSUE_LIMIT)
            .map(|issue| IssueSummary {
                number: issue.number,
                title: issue.title,
                body: clip(issue.body.as_deref().unwrap_or(""), ISSUE_BODY_CHARS),
                labels: issue.labels.into_iter().map(|l| l.name).collect(),
                state: issue.state,
                created_at: issue.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl ActivitySource for GitHubFetcher {
    async fn snapshot(&self, days_back: u32) -> Result<GitHubSnapshot, SourceError> {
        let repository = self.repository_stats().await?;
        let commits = self.recent_commits(days_back).await?;
        let pull_requests = self.open_pull_requests().await?;
        let issues = self.recent_issues().await?;

        Ok(GitHubSnapshot {
            repository,
            days_back,
            commits,
            pull_requests,
            issues,
        })
    }

    fn repository(&self) -> String {
        format!("{}/{}", self.settings.owner, self.settings.repo)
    }
}

#[async_trait]
impl SourceFetcher for GitHubFetcher {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn fetch(&self, days_back: u32) -> Result<Value, SourceError> {
        let snapshot = self.snapshot(days_back).await?;
        let mut value = serde_json::to_value(&snapshot)
            .map_err(|e| SourceError::InvalidResponse(e.to_string()))?;
        value["source"] = Value::from("github");
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn fetcher(server: &ServerGuard) -> GitHubFetcher {
        GitHubFetcher::new(GitHubSettings {
            token: "ghp_test".to_string(),
            owner: "acme".to_string(),
            repo: "app".to_string(),
            api_url: server.url(),
        })
        .unwrap()
    }

    fn repo_body() -> String {
        json!({
            "name": "app",
            "full_name": "acme/app",
            "description": null,
            "stargazers_count": 42,
            "forks_count": 3,
            "open_issues_count": 5,
            "language": "Rust",
            "default_branch": "main"
        })
        .to_string()
    }

    #[tokio::test]
    async fn repository_stats_are_mapped() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/app")
            .match_header("authorization", "Bearer ghp_test")
            .with_status(200)
            .with_body(repo_body())
            .create_async()
            .await;

        let stats = fetcher(&server).repository_stats().await.unwrap();
        mock.assert_async().await;
        assert_eq!(stats.full_name, "acme/app");
        assert_eq!(stats.stars, 42);
        assert_eq!(stats.language.as_deref(), Some("Rust"));
        assert!(stats.description.is_none());
    }

    #[tokio::test]
    async fn commits_carry_detail_stats() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/app/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!([{
                    "sha": "0123456789abcdef",
                    "html_url": "https://github.com/acme/app/commit/0123456789abcdef",
                    "commit": {
                        "message": "Add login",
                        "author": {"name": "Dana", "date": "2026-01-01T10:00:00Z"}
                    }
                }])
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/repos/acme/app/commits/0123456789abcdef")
            .with_status(200)
            .with_body(
                json!({
                    "stats": {"additions": 30, "deletions": 4, "total": 34},
                    "files": [{"filename": "a.rs"}, {"filename": "b.rs"}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let commits = fetcher(&server).recent_commits(1).await.unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].sha, "01234567");
        assert_eq!(commits[0].author, "Dana");
        assert_eq!(commits[0].additions, 30);
        assert_eq!(commits[0].deletions, 4);
        assert_eq!(commits[0].files_changed, 2);
    }

    #[tokio::test]
    async fn empty_repository_has_no_commits() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/app/commits")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body(r#"{"message":"Git Repository is empty."}"#)
            .create_async()
            .await;

        let commits = fetcher(&server).recent_commits(7).await.unwrap();
        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_names_the_token_variable() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/app")
            .with_status(401)
            .create_async()
            .await;

        let err = fetcher(&server).repository_stats().await.unwrap_err();
        assert!(matches!(err, SourceError::Unauthorized("GITHUB_TOKEN")));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[tokio::test]
    async fn rate_limit_and_server_errors_are_distinct() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/app/pulls")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/acme/app/issues")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let gh = fetcher(&server);
        assert!(matches!(gh.open_pull_requests().await, Err(SourceError::RateLimited)));
        assert!(matches!(gh.recent_issues().await, Err(SourceError::Server(_))));
    }

    #[tokio::test]
    async fn issues_exclude_pull_requests_and_clip_bodies() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/app/issues")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!([
                    {
                        "number": 1,
                        "title": "Crash on login",
                        "body": "x".repeat(900),
                        "labels": [{"name": "bug"}],
                        "state": "open",
                        "created_at": "2026-01-01T00:00:00Z"
                    },
                    {
                        "number": 2,
                        "title": "A pull request",
                        "body": null,
                        "labels": [],
                        "state": "open",
                        "created_at": "2026-01-02T00:00:00Z",
                        "pull_request": {"url": "https://api.github.com/repos/acme/app/pulls/2"}
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let issues = fetcher(&server).recent_issues().await.unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].labels, vec!["bug"]);
        assert_eq!(issues[0].body.len(), 500);
    }

    #[tokio::test]
    async fn fetch_tags_payload_with_source() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/acme/app")
            .with_status(200)
            .with_body(repo_body())
            .create_async()
            .await;
        server
            .mock("GET", "/repos/acme/app/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/repos/acme/app/pulls")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!([{
                    "number": 7,
                    "title": "Add search",
                    "user": {"login": "sam"},
                    "state": "open",
                    "created_at": "2026-01-03T00:00:00Z",
                    "html_url": "https://github.com/acme/app/pull/7"
                }])
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/repos/acme/app/issues")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let value = fetcher(&server).fetch(3).await.unwrap();
        assert_eq!(value["source"], "github");
        assert_eq!(value["days_back"], 3);
        assert_eq!(value["repository"]["full_name"], "acme/app");
        assert_eq!(value["pull_requests"][0]["author"], "sam");
    }
}

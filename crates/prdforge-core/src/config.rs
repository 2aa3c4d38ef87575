// ABOUTME: Configuration loading and validation for prdforge from environment variables.
// ABOUTME: Sources are enabled only when all of their credentials are present.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("report interval must be between 1 and {} hours, got {}", MAX_SCHEDULE_HOURS, .0)]
    ScheduleOutOfRange(u64),

    #[error("PRDFORGE_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("unsupported LLM provider {0:?} (expected gemini, openai or anthropic)")]
    UnknownProvider(String),
}

/// Hosted LLM backends prdforge can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenAi,
    Anthropic,
}

impl LlmProvider {
    pub fn label(&self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(LlmProvider::Gemini),
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" => Ok(LlmProvider::Anthropic),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GitHubSettings {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct TrelloSettings {
    pub api_key: String,
    pub token: String,
    pub board_id: String,
}

#[derive(Debug, Clone)]
pub struct NotionSettings {
    pub token: String,
    pub database_id: String,
}

/// Everything prdforge reads from its environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmSettings,
    pub github: Option<GitHubSettings>,
    pub trello: Option<TrelloSettings>,
    pub notion: Option<NotionSettings>,
    pub log_level: String,
    pub report_schedule_hours: u64,
    pub output_dir: PathBuf,
    pub bind: SocketAddr,
}

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Longest accepted monitoring interval, one leap year.
pub const MAX_SCHEDULE_HOURS: u64 = 24 * 366;

/// Monitoring interval for `hours`, rejecting zero and anything past
/// [`MAX_SCHEDULE_HOURS`].
pub fn schedule_interval(hours: u64) -> Result<Duration, ConfigError> {
    if hours == 0 || hours > MAX_SCHEDULE_HOURS {
        return Err(ConfigError::ScheduleOutOfRange(hours));
    }
    hours
        .checked_mul(3600)
        .map(Duration::from_secs)
        .ok_or(ConfigError::ScheduleOutOfRange(hours))
}

impl Settings {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - PRDFORGE_LLM_PROVIDER: gemini | openai | anthropic (default: gemini)
    /// - PRDFORGE_LLM_MODEL: model override (optional)
    /// - GEMINI_API_KEY or GOOGLE_API_KEY / OPENAI_API_KEY / ANTHROPIC_API_KEY
    /// - GEMINI_BASE_URL / OPENAI_BASE_URL / ANTHROPIC_BASE_URL (optional)
    /// - GITHUB_TOKEN, GITHUB_REPO_OWNER, GITHUB_REPO_NAME, GITHUB_API_URL
    /// - TRELLO_API_KEY, TRELLO_TOKEN, TRELLO_BOARD_ID
    /// - NOTION_TOKEN, NOTION_DATABASE_ID
    /// - LOG_LEVEL (default: info)
    /// - REPORT_SCHEDULE_HOURS (default: 24)
    /// - PRDFORGE_OUTPUT_DIR (default: output)
    /// - PRDFORGE_BIND (default: 127.0.0.1:8000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Empty
    /// values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match get("PRDFORGE_LLM_PROVIDER") {
            Some(value) => value.parse()?,
            None => LlmProvider::Gemini,
        };
        let (key_var, url_var) = match provider {
            LlmProvider::Gemini => ("GEMINI_API_KEY", "GEMINI_BASE_URL"),
            LlmProvider::OpenAi => ("OPENAI_API_KEY", "OPENAI_BASE_URL"),
            LlmProvider::Anthropic => ("ANTHROPIC_API_KEY", "ANTHROPIC_BASE_URL"),
        };
        let api_key = get(key_var).or_else(|| match provider {
            LlmProvider::Gemini => get("GOOGLE_API_KEY"),
            _ => None,
        });
        let llm = LlmSettings {
            provider,
            model: get("PRDFORGE_LLM_MODEL"),
            api_key,
            base_url: get(url_var),
        };

        let github = match (get("GITHUB_TOKEN"), get("GITHUB_REPO_OWNER"), get("GITHUB_REPO_NAME")) {
            (Some(token), Some(owner), Some(repo)) => Some(GitHubSettings {
                token,
                owner,
                repo,
                api_url: get("GITHUB_API_URL")
                    .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            }),
            _ => None,
        };

        let trello = match (get("TRELLO_API_KEY"), get("TRELLO_TOKEN"), get("TRELLO_BOARD_ID")) {
            (Some(api_key), Some(token), Some(board_id)) => Some(TrelloSettings {
                api_key,
                token,
                board_id,
            }),
            _ => None,
        };

        let notion = match (get("NOTION_TOKEN"), get("NOTION_DATABASE_ID")) {
            (Some(token), Some(database_id)) => Some(NotionSettings { token, database_id }),
            _ => None,
        };

        let report_schedule_hours = match get("REPORT_SCHEDULE_HOURS") {
            Some(value) => {
                let hours = value
                    .parse::<u64>()
                    .ok()
                    .filter(|hours| *hours > 0)
                    .ok_or(ConfigError::InvalidNumber {
                        var: "REPORT_SCHEDULE_HOURS",
                        value,
                    })?;
                schedule_interval(hours)?;
                hours
            }
            None => 24,
        };

        let bind_str = get("PRDFORGE_BIND").unwrap_or_else(|| "127.0.0.1:8000".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        Ok(Self {
            llm,
            github,
            trello,
            notion,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            report_schedule_hours,
            output_dir: get("PRDFORGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("output")),
            bind,
        })
    }

    /// Names of the sources that have complete credentials.
    pub fn enabled_sources(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.github.is_some() {
            names.push("github");
        }
        if self.trello.is_some() {
            names.push("trello");
        }
        if self.notion.is_some() {
            names.push("notion");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn config_loads_defaults() {
        let config = settings(&[]).unwrap();

        assert_eq!(config.llm.provider, LlmProvider::Gemini);
        assert!(config.llm.api_key.is_none());
        assert!(config.github.is_none());
        assert!(config.trello.is_none());
        assert!(config.notion.is_none());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.report_schedule_hours, 24);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.bind, "127.0.0.1:8000".parse::<SocketAddr>().unwrap());
        assert!(config.enabled_sources().is_empty());
    }

    #[test]
    fn gemini_accepts_google_api_key() {
        let config = settings(&[("GOOGLE_API_KEY", "g-key")]).unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("g-key"));

        let config = settings(&[("GOOGLE_API_KEY", "g-key"), ("GEMINI_API_KEY", "gem")]).unwrap();
        assert_eq!(config.llm.api_key.as_deref(), Some("gem"));
    }

    #[test]
    fn provider_selects_its_own_key_and_url() {
        let config = settings(&[
            ("PRDFORGE_LLM_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_BASE_URL", "http://localhost:9999"),
            ("GEMINI_API_KEY", "unused"),
            ("PRDFORGE_LLM_MODEL", "gpt-4o-mini"),
        ])
        .unwrap();
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(config.llm.model.as_deref(), Some("gpt-4o-mini"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = settings(&[("PRDFORGE_LLM_PROVIDER", "llama")]).unwrap_err();
        assert!(err.to_string().contains("llama"));
    }

    #[test]
    fn sources_need_complete_credentials() {
        let config = settings(&[
            ("GITHUB_TOKEN", "ghp"),
            ("GITHUB_REPO_OWNER", "acme"),
            ("TRELLO_API_KEY", "k"),
            ("TRELLO_TOKEN", "t"),
            ("TRELLO_BOARD_ID", "b"),
            ("NOTION_TOKEN", "secret"),
            ("NOTION_DATABASE_ID", ""),
        ])
        .unwrap();
        assert!(config.github.is_none(), "repo name missing");
        assert!(config.notion.is_none(), "empty database id counts as unset");
        assert_eq!(config.enabled_sources(), vec!["trello"]);

        let config = settings(&[
            ("GITHUB_TOKEN", "ghp"),
            ("GITHUB_REPO_OWNER", "acme"),
            ("GITHUB_REPO_NAME", "app"),
        ])
        .unwrap();
        let github = config.github.unwrap();
        assert_eq!(github.api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(github.repo, "app");
    }

    #[test]
    fn schedule_hours_must_be_positive() {
        assert_eq!(
            settings(&[("REPORT_SCHEDULE_HOURS", "6")]).unwrap().report_schedule_hours,
            6
        );
        for bad in ["0", "-1", "daily"] {
            let err = settings(&[("REPORT_SCHEDULE_HOURS", bad)]).unwrap_err();
            assert!(err.to_string().contains("REPORT_SCHEDULE_HOURS"), "{}", err);
        }
    }

    #[test]
    fn schedule_hours_are_bounded() {
        let max = MAX_SCHEDULE_HOURS.to_string();
        assert!(settings(&[("REPORT_SCHEDULE_HOURS", max.as_str())]).is_ok());

        let too_long = (MAX_SCHEDULE_HOURS + 1).to_string();
        for bad in [too_long.as_str(), "18446744073709551615"] {
            let err = settings(&[("REPORT_SCHEDULE_HOURS", bad)]).unwrap_err();
            assert!(matches!(err, ConfigError::ScheduleOutOfRange(_)), "{}", err);
        }
    }

    #[test]
    fn schedule_interval_converts_hours() {
        assert_eq!(schedule_interval(2).unwrap(), Duration::from_secs(7200));
        assert!(schedule_interval(0).is_err());
        assert!(schedule_interval(u64::MAX).is_err());
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let err = settings(&[("PRDFORGE_BIND", "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind(_)));
    }
}

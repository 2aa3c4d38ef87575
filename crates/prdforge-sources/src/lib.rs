// ABOUTME: REST fetchers for the external data sources prdforge analyzes: GitHub, Trello and Notion.
// ABOUTME: Each fetcher returns raw JSON for the analysis prompt; GitHub also exposes typed activity snapshots.

pub mod error;
pub mod github;
mod http;
pub mod notion;
pub mod trello;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use prdforge_core::GitHubSnapshot;
use prdforge_core::config::Settings;

pub use error::SourceError;
pub use github::GitHubFetcher;
pub use notion::NotionFetcher;
pub use trello::TrelloFetcher;

/// A single external source of product data.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Key under which this source's payload is stored (e.g. "github").
    fn name(&self) -> &'static str;

    /// Fetch the source's raw data covering the last `days_back` days
    /// where the source has a notion of time.
    async fn fetch(&self, days_back: u32) -> Result<Value, SourceError>;
}

/// Repository activity used by the GitHub reporter.
#[async_trait]
pub trait ActivitySource: Send + Sync {
    async fn snapshot(&self, days_back: u32) -> Result<GitHubSnapshot, SourceError>;

    /// `owner/repo`, for logging.
    fn repository(&self) -> String;
}

#[async_trait]
impl<T: SourceFetcher + ?Sized> SourceFetcher for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(&self, days_back: u32) -> Result<Value, SourceError> {
        (**self).fetch(days_back).await
    }
}

/// The fetchers built from [`Settings`]. When GitHub is configured its
/// fetcher also serves as the activity source, sharing one HTTP client.
pub struct ConfiguredSources {
    pub fetchers: Vec<Box<dyn SourceFetcher>>,
    pub activity: Option<Arc<dyn ActivitySource>>,
}

/// Every source that has complete credentials in `settings`.
pub fn configured_fetchers(settings: &Settings) -> Result<ConfiguredSources, SourceError> {
    let mut fetchers: Vec<Box<dyn SourceFetcher>> = Vec::new();
    let mut activity: Option<Arc<dyn ActivitySource>> = None;

    if let Some(ref github) = settings.github {
        let github = Arc::new(GitHubFetcher::new(github.clone())?);
        activity = Some(Arc::clone(&github) as Arc<dyn ActivitySource>);
        fetchers.push(Box::new(github));
    }
    if let Some(ref trello) = settings.trello {
        fetchers.push(Box::new(TrelloFetcher::new(trello.clone())?));
    }
    if let Some(ref notion) = settings.notion {
        fetchers.push(Box::new(NotionFetcher::new(notion.clone())?));
    }

    tracing::debug!(
        sources = ?fetchers.iter().map(|f| f.name()).collect::<Vec<_>>(),
        "configured data sources"
    );
    Ok(ConfiguredSources { fetchers, activity })
}

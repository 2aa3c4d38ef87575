// ABOUTME: Trello REST fetcher: lists and cards of the configured board, with cards resolved to their list names.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use prdforge_core::config::TrelloSettings;

use crate::SourceFetcher;
use crate::error::SourceError;
use crate::http::{build_client, check_status, clip};

const DEFAULT_BASE_URL: &str = "https://api.trello.com";
const CARD_LIMIT: usize = 100;
const DESCRIPTION_CHARS: usize = 500;

pub struct TrelloFetcher {
    client: Client,
    settings: TrelloSettings,
    base_url: String,
}

#[derive(Deserialize)]
struct ListPayload {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct LabelPayload {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardPayload {
    name: String,
    #[serde(default)]
    desc: String,
    id_list: String,
    #[serde(default)]
    labels: Vec<LabelPayload>,
    due: Option<String>,
    date_last_activity: Option<String>,
}

#[derive(Debug, Serialize)]
struct CardSummary {
    name: String,
    description: String,
    list: String,
    labels: Vec<String>,
    due: Option<String>,
    last_activity: Option<String>,
}

impl TrelloFetcher {
    pub fn new(settings: TrelloSettings) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client()?,
            settings,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn board_get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        extra: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!(
            "{}/1/boards/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.settings.board_id,
            resource
        );
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.settings.api_key.as_str()),
                ("token", self.settings.token.as_str()),
            ])
            .query(extra)
            .send()
            .await?;
        let response = check_status(response, "TRELLO_TOKEN").await?;
        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("failed to parse {}: {}", resource, e)))
    }
}

#[async_trait]
impl SourceFetcher for TrelloFetcher {
    fn name(&self) -> &'static str {
        "trello"
    }

    /// Trello boards are snapshots of current work, so `days_back` is unused.
    async fn fetch(&self, _days_back: u32) -> Result<Value, SourceError> {
        let lists: Vec<ListPayload> = self.board_get("lists", &[("filter", "open")]).await?;
        let cards: Vec<CardPayload> = self
            .board_get(
                "cards",
                &[("fields", "name,desc,idList,labels,due,dateLastActivity")],
            )
            .await?;

        let list_names: HashMap<&str, &str> = lists
            .iter()
            .map(|l| (l.id.as_str(), l.name.as_str()))
            .collect();

        let summaries: Vec<CardSummary> = cards
            .iter()
            .take(CARD_LIMIT)
            .map(|card| CardSummary {
                name: card.name.clone(),
                description: clip(&card.desc, DESCRIPTION_CHARS),
                list: list_names
                    .get(card.id_list.as_str())
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                labels: card
                    .labels
                    .iter()
                    .filter(|l| !l.name.is_empty())
                    .map(|l| l.name.clone())
                    .collect(),
                due: card.due.clone(),
                last_activity: card.date_last_activity.clone(),
            })
            .collect();

        tracing::info!(lists = lists.len(), cards = summaries.len(), "fetched trello board");

        Ok(json!({
            "source": "trello",
            "board_id": self.settings.board_id,
            "lists": lists.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
            "cards": summaries,
        }))
    }
}

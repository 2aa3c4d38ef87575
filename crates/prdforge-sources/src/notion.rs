// ABOUTME: Notion REST fetcher: queries the configured database and flattens page properties to plain text.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use prdforge_core::config::NotionSettings;

use crate::SourceFetcher;
use crate::error::SourceError;
use crate::http::{build_client, check_status};

const DEFAULT_BASE_URL: &str = "https://api.notion.com";
const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 50;

pub struct NotionFetcher {
    client: Client,
    settings: NotionSettings,
    base_url: String,
}

#[derive(Deserialize)]
struct QueryPayload {
    #[serde(default)]
    results: Vec<PagePayload>,
}

#[derive(Deserialize)]
struct PagePayload {
    id: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    last_edited_time: String,
    #[serde(default)]
    properties: Map<String, Value>,
}

impl NotionFetcher {
    pub fn new(settings: NotionSettings) -> Result<Self, SourceError> {
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
}

/// Concatenated `plain_text` of a rich-text or title array.
fn plain_text(items: Option<&Value>) -> String {
    items
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|t| t.get("plain_text").and_then(|p| p.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Reduce a Notion property object to a displayable string, or None for
/// property types that carry nothing useful for analysis.
fn property_text(property: &Value) -> Option<String> {
    let kind = property.get("type")?.as_str()?;
    let inner = property.get(kind);
    let text = match kind {
        "title" | "rich_text" => plain_text(inner),
        "select" | "status" => inner?.get("name")?.as_str()?.to_string(),
        "multi_select" => inner?
            .as_array()?
            .iter()
            .filter_map(|o| o.get("name").and_then(|n| n.as_str()))
            .collect::<Vec<_>>()
            .join(", "),
        "number" => inner?.as_f64()?.to_string(),
        "checkbox" => inner?.as_bool()?.to_string(),
        "date" => inner?.get("start")?.as_str()?.to_string(),
        "url" | "email" | "phone_number" => inner?.as_str()?.to_string(),
        _ => return None,
    };
    if text.is_empty() { None } else { Some(text) }
}

#[async_trait]
impl SourceFetcher for NotionFetcher {
    fn name(&self) -> &'static str {
        "notion"
    }

    async fn fetch(&self, _days_back: u32) -> Result<Value, SourceError> {
        let url = format!(
            "{}/v1/databases/{}/query",
            self.base_url.trim_end_matches('/'),
            self.settings.database_id
        );
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&json!({ "page_size": PAGE_SIZE }))
            .send()
            .await?;
        let response = check_status(response, "NOTION_TOKEN").await?;
        let payload: QueryPayload = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("failed to parse query: {}", e)))?;

        let pages: Vec<Value> = payload
            .results
            .iter()
            .map(|page| {
                let mut title = String::new();
                let mut properties = Map::new();
                for (name, property) in &page.properties {
                    if property.get("type").and_then(|t| t.as_str()) == Some("title") {
                        title = plain_text(property.get("title"));
                    } else if let Some(text) = property_text(property) {
                        properties.insert(name.clone(), Value::String(text));
                    }
                }
                json!({
                    "id": page.id,
                    "title": title,
                    "url": page.url,
                    "last_edited_time": page.last_edited_time,
                    "properties": properties,
                })
            })
            .collect();

        tracing::info!(pages = pages.len(), "fetched notion database");

        Ok(json!({
            "source": "notion",
            "database_id": self.settings.database_id,
            "pages": pages,
        }))
    }
}

// ABOUTME: Shared reqwest client construction and HTTP status mapping for the source fetchers.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::error::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("prdforge/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client() -> Result<Client, SourceError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| SourceError::Http(format!("failed to build HTTP client: {}", e)))
}

/// Map non-success statuses to errors. `credential` names the variable to
/// check when the service rejects our credentials.
pub(crate) async fn check_status(
    response: Response,
    credential: &'static str,
) -> Result<Response, SourceError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited);
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SourceError::Unauthorized(credential));
    }

    if status.is_server_error() {
        return Err(SourceError::Server(status.to_string()));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Api {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

/// First `max` characters of `text`.
pub(crate) fn clip(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

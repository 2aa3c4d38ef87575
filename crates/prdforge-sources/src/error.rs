// ABOUTME: Error type shared by every source fetcher.

/// Errors that can occur while fetching from an external source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized: check {0}")]
    Unauthorized(&'static str),

    #[error("Server error: {0}")]
    Server(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SourceError::InvalidResponse(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

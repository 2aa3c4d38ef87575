// ABOUTME: API module containing all HTTP handler functions for the prdforge JSON API.
// ABOUTME: Organized into sub-modules for GitHub reports, analysis with PRD generation, and workflows.

pub mod analysis;
pub mod github;
pub mod workflow;

use crate::error::ApiError;

/// Largest reporting window accepted by the API.
pub const MAX_DAYS: u32 = 365;

/// RFC 3339 timestamp stamped on every response.
pub fn generated_at() -> String {
    chrono::Utc::now().to_rfc3339()
}

pub(crate) fn validate_days(days: u32) -> Result<u32, ApiError> {
    if days == 0 || days > MAX_DAYS {
        return Err(ApiError::BadRequest(format!(
            "days must be between 1 and {}, got {}",
            MAX_DAYS, days
        )));
    }
    Ok(days)
}

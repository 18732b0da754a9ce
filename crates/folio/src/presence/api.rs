//! Lanyard HTTP client.

use std::time::Duration;

use async_trait::async_trait;

use super::normalize::normalize;
use super::payload::LanyardResponse;
use super::PresenceSnapshot;
use crate::poller::Source;

/// Public Lanyard REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.lanyard.rest";

/// Discord user shown on the card.
pub const DEFAULT_USER_ID: &str = "714702739908722742";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from fetching or normalizing presence.
#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Lanyard reported failure: {0}")]
    Unsuccessful(String),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, PresenceError>;

/// Fetches one user's presence from Lanyard.
#[derive(Debug, Clone)]
pub struct LanyardClient {
    client: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl LanyardClient {
    pub fn new(base_url: &str, user_id: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!("{}/v1/users/{}", self.base_url, self.user_id)
    }

    /// GET the user's presence and normalize it.
    pub async fn fetch_presence(&self) -> Result<PresenceSnapshot> {
        let response = self.client.get(self.url()).send().await?;

        let status = response.status();
        let body = response.text().await?;

        // Lanyard answers unknown users with 404 plus a JSON failure envelope;
        // prefer its message when one parses.
        let parsed: std::result::Result<LanyardResponse, _> = serde_json::from_str(&body);
        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.error)
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(PresenceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.map_err(|e| PresenceError::Malformed(e.to_string()))?;
        normalize(parsed)
    }
}

#[async_trait]
impl Source for LanyardClient {
    type Snapshot = PresenceSnapshot;
    type Error = PresenceError;

    fn name(&self) -> &'static str {
        "presence"
    }

    async fn fetch(&self) -> Result<PresenceSnapshot> {
        self.fetch_presence().await
    }
}

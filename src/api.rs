//! Creature list HTTP client.

use crate::creature::Creature;
use crate::error::FetchError;
use crate::gallery::Action;
use std::path::Path;

/// Public endpoint serving the full creature list.
pub const DEFAULT_API_URL: &str = "https://digimon-api.vercel.app/api/digimon";

/// Client for the creature list endpoint.
///
/// The list is fetched once per session. There is no retry and no
/// cancellation; the caller decides what to show on failure.
#[derive(Debug, Clone)]
pub struct DigimonApi {
    url: String,
    http_client: reqwest::Client,
}

impl DigimonApi {
    /// Client for the public endpoint.
    pub fn public() -> Self {
        Self::new(DEFAULT_API_URL)
    }

    /// Client for a specific endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and decode the creature list.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Transport`] if the request fails
    /// - [`FetchError::Status`] for a non-success response
    /// - [`FetchError::Decode`] if the body is not a creature list
    pub async fn fetch_creatures(&self) -> Result<Vec<Creature>, FetchError> {
        tracing::debug!("Fetching creature list from {}", self.url);

        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_creatures(&body)
    }

    /// Fetch the list and turn the outcome into a gallery event.
    pub async fn load_action(&self) -> Action {
        match self.fetch_creatures().await {
            Ok(creatures) => Action::Loaded(creatures),
            Err(e) => Action::LoadFailed(e.to_string()),
        }
    }
}

/// Decode a creature list from a JSON body.
pub fn parse_creatures(body: &str) -> Result<Vec<Creature>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Read a creature list from a JSON file instead of the network.
pub fn load_creatures_file(path: &Path) -> Result<Vec<Creature>, FetchError> {
    let body = std::fs::read_to_string(path)?;
    parse_creatures(&body)
}

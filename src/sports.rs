//! Client for the Cricbuzz sports data API (via RapidAPI).
//!
//! Response bodies are passed through as opaque JSON. Any transport failure,
//! timeout or non-success status is reported as
//! [`DashboardError::ApiUnavailable`].

use crate::error::{DashboardError, DashboardResult};
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, warn};

pub const LIVE_MATCHES_PATH: &str = "/matches/v1/live";
pub const UPCOMING_MATCHES_PATH: &str = "/matches/v1/upcoming";
pub const PLAYER_SEARCH_PATH: &str = "/stats/v1/player/search";

/// Settings for [`SportsApiClient`].
#[derive(Clone)]
pub struct SportsApiConfig {
    /// e.g. "https://cricbuzz-cricket.p.rapidapi.com"
    pub base_url: String,
    /// Sent as `x-rapidapi-host`
    pub api_host: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for SportsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SportsApiConfig")
            .field("base_url", &self.base_url)
            .field("api_host", &self.api_host)
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SportsApiClient {
    http_client: Client,
    config: SportsApiConfig,
}

impl SportsApiClient {
    /// Build the client. Fails when the HTTP stack cannot be initialized.
    pub fn new(config: SportsApiConfig) -> DashboardResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DashboardError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub async fn live_matches(&self) -> DashboardResult<JsonValue> {
        self.get(LIVE_MATCHES_PATH, &[]).await
    }

    pub async fn upcoming_matches(&self) -> DashboardResult<JsonValue> {
        self.get(UPCOMING_MATCHES_PATH, &[]).await
    }

    /// Search players by name.
    pub async fn search_players(&self, name: &str) -> DashboardResult<JsonValue> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardError::validation("Player name cannot be empty."));
        }
        self.get(PLAYER_SEARCH_PATH, &[("plrN", name)]).await
    }

    /// Profile of one player by Cricbuzz id.
    pub async fn player_details(&self, player_id: u64) -> DashboardResult<JsonValue> {
        self.get(&format!("/stats/v1/player/{}", player_id), &[]).await
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> DashboardResult<JsonValue> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| DashboardError::api_unavailable(path, "RAPIDAPI_KEY is not configured"))?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(url = %url, "Fetching sports data");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", &self.config.api_host)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %path, error = %e, "Sports API request failed");
                DashboardError::api_unavailable(path, e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %path, status = %status, "Sports API returned an error status");
            return Err(DashboardError::api_unavailable(
                path,
                format!("status {}", status),
            ));
        }

        response.json::<JsonValue>().await.map_err(|e| {
            warn!(endpoint = %path, error = %e, "Sports API returned an unreadable body");
            DashboardError::api_unavailable(path, format!("invalid JSON body: {}", e))
        })
    }
}

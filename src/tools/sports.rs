//! Sports data tools.
//!
//! Thin wrappers over [`SportsApiClient`]; response bodies are returned as-is.

use crate::error::DashboardResult;
use crate::sports::SportsApiClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Input for the search_players tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchPlayersInput {
    /// Player name or part of it, e.g. "Kohli"
    pub name: String,
}

/// Input for the player_details tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlayerDetailsInput {
    /// Cricbuzz player id, as returned by search_players
    pub player_id: u64,
}

/// Raw response of the sports data API.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SportsDataOutput {
    pub data: JsonValue,
}

pub struct SportsToolHandler {
    client: Arc<SportsApiClient>,
}

impl SportsToolHandler {
    pub fn new(client: Arc<SportsApiClient>) -> Self {
        Self { client }
    }

    pub async fn live_matches(&self) -> DashboardResult<SportsDataOutput> {
        let data = self.client.live_matches().await?;
        Ok(SportsDataOutput { data })
    }

    pub async fn upcoming_matches(&self) -> DashboardResult<SportsDataOutput> {
        let data = self.client.upcoming_matches().await?;
        Ok(SportsDataOutput { data })
    }

    pub async fn search_players(
        &self,
        input: SearchPlayersInput,
    ) -> DashboardResult<SportsDataOutput> {
        let data = self.client.search_players(&input.name).await?;
        Ok(SportsDataOutput { data })
    }

    pub async fn player_details(
        &self,
        input: PlayerDetailsInput,
    ) -> DashboardResult<SportsDataOutput> {
        let data = self.client.player_details(input.player_id).await?;
        Ok(SportsDataOutput { data })
    }
}

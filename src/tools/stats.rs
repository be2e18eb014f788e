//! Dashboard view tools.
//!
//! Fixed, filterable reads over the cricket tables: filter dropdown values,
//! recent matches, match scorecards, the player list and top players. Every
//! filter value is bound as a parameter.

use crate::db::Connector;
use crate::error::DashboardResult;
use crate::models::{MatchFilter, PlayerFilter, Specialty};
use crate::tools::context::{ToolContext, required_name};
use crate::tools::format::OutputFormat;
use crate::tools::query::QueryOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Input for the filter_options tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FilterOptionsInput {
    /// Database name. Defaults to the configured database.
    #[serde(default)]
    pub database: Option<String>,
    /// e.g. "recent_matches" or "players"
    pub table: String,
    /// e.g. "match_format", "state", "country", "playing_role"
    pub column: String,
}

/// Output from the filter_options tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FilterOptionsOutput {
    pub column: String,
    /// Distinct non-null values, sorted by the server
    pub values: Vec<JsonValue>,
    pub count: usize,
    pub sql: String,
}

/// Input for the recent_matches tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct RecentMatchesInput {
    #[serde(default)]
    pub database: Option<String>,
    /// Match format to keep, e.g. "ODI". Omit or "All" for every format.
    #[serde(default)]
    pub match_format: Option<String>,
    /// Match state to keep, e.g. "Complete". Omit or "All" for every state.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Input for the match_scorecard tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MatchScorecardInput {
    #[serde(default)]
    pub database: Option<String>,
    pub match_id: i64,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Batting and bowling cards of one match.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MatchScorecardOutput {
    pub match_id: i64,
    pub batting: QueryOutput,
    pub bowling: QueryOutput,
}

/// Input for the list_players tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListPlayersInput {
    #[serde(default)]
    pub database: Option<String>,
    /// Part of the player's name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// e.g. "Batsman", "Bowler", "Batting Allrounder"
    #[serde(default)]
    pub playing_role: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Input for the top_players tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TopPlayersInput {
    #[serde(default)]
    pub database: Option<String>,
    /// "batting" (default) or "bowling"
    #[serde(default)]
    pub specialty: Specialty,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Handler for dashboard view tools.
pub struct StatsToolHandler<C> {
    context: Arc<ToolContext<C>>,
}

impl<C: Connector> StatsToolHandler<C> {
    pub fn new(context: Arc<ToolContext<C>>) -> Self {
        Self { context }
    }

    pub async fn filter_options(
        &self,
        input: FilterOptionsInput,
    ) -> DashboardResult<FilterOptionsOutput> {
        let table = required_name(&input.table, "table")?;
        let column = required_name(&input.column, "column")?;
        let database = self.context.database(input.database.as_deref());

        let result = self
            .context
            .executor
            .distinct_values(self.context.params(), database, table, column)
            .await?;

        let values: Vec<JsonValue> = result
            .rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().map(|(_, value)| value))
            .filter(|value| !value.is_null())
            .collect();
        Ok(FilterOptionsOutput {
            column: column.to_string(),
            count: values.len(),
            values,
            sql: result.sql,
        })
    }

    pub async fn recent_matches(&self, input: RecentMatchesInput) -> DashboardResult<QueryOutput> {
        let database = self.context.database(input.database.as_deref());
        let filter = MatchFilter {
            match_format: input.match_format,
            state: input.state,
        };

        let start = Instant::now();
        let result = self
            .context
            .executor
            .recent_matches(self.context.params(), database, &filter)
            .await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            database = %database,
            row_count = result.row_count(),
            execution_time_ms = execution_time_ms,
            "Recent matches fetched"
        );
        Ok(QueryOutput::from_result(result, input.format, execution_time_ms))
    }

    pub async fn match_scorecard(
        &self,
        input: MatchScorecardInput,
    ) -> DashboardResult<MatchScorecardOutput> {
        let database = self.context.database(input.database.as_deref());

        let start = Instant::now();
        let (batting, bowling) = self
            .context
            .executor
            .match_scorecard(self.context.params(), database, input.match_id)
            .await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            database = %database,
            match_id = input.match_id,
            batters = batting.row_count(),
            bowlers = bowling.row_count(),
            "Scorecard fetched"
        );
        Ok(MatchScorecardOutput {
            match_id: input.match_id,
            batting: QueryOutput::from_result(batting, input.format, execution_time_ms),
            bowling: QueryOutput::from_result(bowling, input.format, execution_time_ms),
        })
    }

    pub async fn list_players(&self, input: ListPlayersInput) -> DashboardResult<QueryOutput> {
        let database = self.context.database(input.database.as_deref());
        let filter = PlayerFilter {
            name: input.name,
            country: input.country,
            playing_role: input.playing_role,
        };

        let start = Instant::now();
        let result = self
            .context
            .executor
            .players(self.context.params(), database, &filter)
            .await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            database = %database,
            row_count = result.row_count(),
            "Players listed"
        );
        Ok(QueryOutput::from_result(result, input.format, execution_time_ms))
    }

    pub async fn top_players(&self, input: TopPlayersInput) -> DashboardResult<QueryOutput> {
        let database = self.context.database(input.database.as_deref());

        let start = Instant::now();
        let result = self
            .context
            .executor
            .top_players(self.context.params(), database, input.specialty)
            .await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        Ok(QueryOutput::from_result(result, input.format, execution_time_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_matches_input_defaults() {
        let input: RecentMatchesInput = serde_json::from_str("{}").unwrap();
        assert!(input.match_format.is_none());
        assert!(input.state.is_none());
        assert_eq!(input.format, OutputFormat::Json);
    }

    #[test]
    fn test_top_players_input_specialty() {
        let input: TopPlayersInput = serde_json::from_str(r#"{"specialty": "bowling"}"#).unwrap();
        assert_eq!(input.specialty, Specialty::Bowling);
        let input: TopPlayersInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.specialty, Specialty::Batting);
    }

    #[test]
    fn test_match_scorecard_requires_id() {
        assert!(serde_json::from_str::<MatchScorecardInput>("{}").is_err());
        let input: MatchScorecardInput =
            serde_json::from_str(r#"{"match_id": 74648}"#).unwrap();
        assert_eq!(input.match_id, 74648);
    }
}

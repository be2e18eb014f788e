//! MCP service implementation using rmcp.
//!
//! [`DashboardService`] exposes the dashboard's database and sports tools
//! through the rmcp framework's macros.

use crate::db::MySqlConnector;
use crate::sports::SportsApiClient;
use crate::tools::ToolContext;
use crate::tools::query::{FetchTableInput, QueryOutput, QueryToolHandler, RunSelectInput};
use crate::tools::schema::{
    DiscoverSchemaOutput, GetTableColumnsInput, GetTableColumnsOutput, ListDatabasesOutput,
    ListTablesInput, ListTablesOutput, SchemaToolHandler,
};
use crate::tools::sports::{
    PlayerDetailsInput, SearchPlayersInput, SportsDataOutput, SportsToolHandler,
};
use crate::tools::stats::{
    FilterOptionsInput, FilterOptionsOutput, ListPlayersInput, MatchScorecardInput,
    MatchScorecardOutput, RecentMatchesInput, StatsToolHandler, TopPlayersInput,
};
use crate::tools::write::{
    DeleteRowsInput, ExecuteUpdateInput, InsertRowInput, MutationOutput, WriteToolHandler,
};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    context: Arc<ToolContext<MySqlConnector>>,
    sports: Arc<SportsApiClient>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl DashboardService {
    pub fn new(context: Arc<ToolContext<MySqlConnector>>, sports: Arc<SportsApiClient>) -> Self {
        Self {
            context,
            sports,
            tool_router: Self::tool_router(),
        }
    }

    fn schema_handler(&self) -> SchemaToolHandler<MySqlConnector> {
        SchemaToolHandler::new(self.context.clone())
    }

    fn query_handler(&self) -> QueryToolHandler<MySqlConnector> {
        QueryToolHandler::new(self.context.clone())
    }

    fn write_handler(&self) -> WriteToolHandler<MySqlConnector> {
        WriteToolHandler::new(self.context.clone())
    }

    fn stats_handler(&self) -> StatsToolHandler<MySqlConnector> {
        StatsToolHandler::new(self.context.clone())
    }

    fn sports_handler(&self) -> SportsToolHandler {
        SportsToolHandler::new(self.sports.clone())
    }
}

#[tool_router]
impl DashboardService {
    #[tool(
        description = "Discover every user database on the server with its tables, columns and views.\nSystem databases and databases without tables are omitted.\nDatabases that could not be read are listed under `failures`."
    )]
    async fn discover_schema(&self) -> Result<Json<DiscoverSchemaOutput>, McpError> {
        self.schema_handler()
            .discover_schema()
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(description = "List user databases that contain at least one table, sorted by name.")]
    async fn list_databases(&self) -> Result<Json<ListDatabasesOutput>, McpError> {
        self.schema_handler()
            .list_databases()
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "List base tables of a database, sorted by name.\nDefaults to the configured database. Unknown databases return an empty list."
    )]
    async fn list_tables(
        &self,
        Parameters(input): Parameters<ListTablesInput>,
    ) -> Result<Json<ListTablesOutput>, McpError> {
        self.schema_handler()
            .list_tables(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Get the columns of a table in declaration order.\nReturns name, type, nullability, key role, default and extra for each column."
    )]
    async fn get_table_columns(
        &self,
        Parameters(input): Parameters<GetTableColumnsInput>,
    ) -> Result<Json<GetTableColumnsOutput>, McpError> {
        self.schema_handler()
            .get_table_columns(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Preview the rows of a table.\n`limit` must be a non-negative integer (default 200).\nOutput format: json (default), table, or markdown."
    )]
    async fn fetch_table(
        &self,
        Parameters(input): Parameters<FetchTableInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        self.query_handler()
            .fetch_table(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Run a read-only query. The query must begin with SELECT.\nOutput format: json (default), table, or markdown."
    )]
    async fn run_select(
        &self,
        Parameters(input): Parameters<RunSelectInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        self.query_handler()
            .run_select(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Insert one row. Values are bound as parameters.\nReturns the affected row count and the SQL that was executed."
    )]
    async fn insert_row(
        &self,
        Parameters(input): Parameters<InsertRowInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        self.write_handler()
            .insert_row(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Delete rows matching a WHERE condition, e.g. `id=5`.\nThe condition is required and is used verbatim."
    )]
    async fn delete_rows(
        &self,
        Parameters(input): Parameters<DeleteRowsInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        self.write_handler()
            .delete_rows(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Update rows: UPDATE `table` SET <set_clause> WHERE <where_clause>.\nBoth clauses are required and are used verbatim."
    )]
    async fn execute_update(
        &self,
        Parameters(input): Parameters<ExecuteUpdateInput>,
    ) -> Result<Json<MutationOutput>, McpError> {
        self.write_handler()
            .execute_update(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Distinct non-null values of a column, sorted. Use these to fill filter choices,\ne.g. table `recent_matches` column `match_format`, or table `players` column `country`."
    )]
    async fn filter_options(
        &self,
        Parameters(input): Parameters<FilterOptionsInput>,
    ) -> Result<Json<FilterOptionsOutput>, McpError> {
        self.stats_handler()
            .filter_options(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "The 50 most recent matches, newest first.\nOptional filters: match_format, state. Omit a filter or pass \"All\" to keep every value."
    )]
    async fn recent_matches(
        &self,
        Parameters(input): Parameters<RecentMatchesInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        self.stats_handler()
            .recent_matches(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Batting and bowling scorecards of one match, ordered by innings.\nBatters are ranked by runs and bowlers by wickets within each innings."
    )]
    async fn match_scorecard(
        &self,
        Parameters(input): Parameters<MatchScorecardInput>,
    ) -> Result<Json<MatchScorecardOutput>, McpError> {
        self.stats_handler()
            .match_scorecard(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "Up to 100 players, newest first.\nOptional filters: name (partial match), country, playing_role. \"All\" means no filter."
    )]
    async fn list_players(
        &self,
        Parameters(input): Parameters<ListPlayersInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        self.stats_handler()
            .list_players(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(
        description = "20 most recently added batsmen (specialty \"batting\") or bowlers (\"bowling\") with a recorded style."
    )]
    async fn top_players(
        &self,
        Parameters(input): Parameters<TopPlayersInput>,
    ) -> Result<Json<QueryOutput>, McpError> {
        self.stats_handler()
            .top_players(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(description = "Fetch live cricket matches from the Cricbuzz API.")]
    async fn live_matches(&self) -> Result<Json<SportsDataOutput>, McpError> {
        self.sports_handler()
            .live_matches()
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(description = "Fetch upcoming cricket matches from the Cricbuzz API.")]
    async fn upcoming_matches(&self) -> Result<Json<SportsDataOutput>, McpError> {
        self.sports_handler()
            .upcoming_matches()
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(description = "Search cricket players by name. Returns matching player ids.")]
    async fn search_players(
        &self,
        Parameters(input): Parameters<SearchPlayersInput>,
    ) -> Result<Json<SportsDataOutput>, McpError> {
        self.sports_handler()
            .search_players(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }

    #[tool(description = "Get the profile of a cricket player by id.")]
    async fn player_details(
        &self,
        Parameters(input): Parameters<PlayerDetailsInput>,
    ) -> Result<Json<SportsDataOutput>, McpError> {
        self.sports_handler()
            .player_details(input)
            .await
            .map(Json)
            .map_err(McpError::from)
    }
}

#[tool_handler]
impl ServerHandler for DashboardService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "cricket-dashboard".to_owned(),
                title: Some("Cricket Dashboard".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Cricket statistics dashboard over a MySQL server and the Cricbuzz API.\n\
                \n\
                ## Database workflow\n\
                1. Call `discover_schema` (or `list_databases`, `list_tables`) to see what exists\n\
                2. Use `get_table_columns` before inserting or updating\n\
                3. `fetch_table` previews rows; `run_select` accepts SELECT queries only\n\
                \n\
                ## Dashboard views\n\
                - `recent_matches` and `list_players` take optional filters; `filter_options` lists their values\n\
                - `match_scorecard` returns batting and bowling cards; `top_players` lists batsmen or bowlers\n\
                \n\
                ## Records\n\
                - `insert_row` binds every value as a parameter\n\
                - `delete_rows` and `execute_update` require a WHERE condition\n\
                \n\
                ## Sports data\n\
                - `live_matches`, `upcoming_matches`, `search_players`, `player_details`\n\
                - These fail with an API error when no RapidAPI key is configured\n\
                \n\
                When `database` is omitted, the configured default database is used."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::test_support::shared_state;

    fn create_test_service() -> DashboardService {
        shared_state().service()
    }

    #[test]
    fn test_server_info() {
        let service = create_test_service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "cricket-dashboard");
        assert!(info.capabilities.tools.is_some());
        let instructions = info.instructions.unwrap();
        assert!(instructions.contains("run_select"));
        assert!(instructions.contains("match_scorecard"));
    }

    #[test]
    fn test_all_tools_registered() {
        let service = create_test_service();
        let mut names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "delete_rows",
                "discover_schema",
                "execute_update",
                "fetch_table",
                "filter_options",
                "get_table_columns",
                "insert_row",
                "list_databases",
                "list_players",
                "list_tables",
                "live_matches",
                "match_scorecard",
                "player_details",
                "recent_matches",
                "run_select",
                "search_players",
                "top_players",
                "upcoming_matches",
            ]
        );
    }

    #[tokio::test]
    async fn test_sports_tool_without_key_is_internal_error() {
        let service = create_test_service();
        let err = service.live_matches().await.err().expect("expected an error");
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_filter_options_requires_column() {
        let service = create_test_service();
        let input = FilterOptionsInput {
            database: None,
            table: "players".to_string(),
            column: " ".to_string(),
        };
        let err = service.filter_options(Parameters(input)).await.err().expect("expected an error");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("column is required"));
    }

    #[tokio::test]
    async fn test_run_select_rejects_before_connecting() {
        let service = create_test_service();
        let input = RunSelectInput {
            database: None,
            sql: "DROP TABLE players".to_string(),
            format: Default::default(),
        };
        let err = service.run_select(Parameters(input)).await.err().expect("expected an error");
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Only SELECT"));
    }
}

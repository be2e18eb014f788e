//! MCP tool implementations.
//!
//! This module contains the dashboard's tool handlers:
//! - `schema`: schema discovery and table/column listings
//! - `query`: table previews and read-only queries
//! - `write`: insert, delete and update of records
//! - `stats`: filterable dashboard views over the cricket tables
//! - `sports`: live/upcoming matches and player lookups

pub mod context;
pub mod format;
pub mod query;
pub mod schema;
pub mod sports;
pub mod stats;
pub mod write;

pub use context::ToolContext;
pub use format::OutputFormat;
pub use query::{FetchTableInput, QueryOutput, QueryToolHandler, RunSelectInput};
pub use schema::{
    DiscoverSchemaOutput, GetTableColumnsInput, GetTableColumnsOutput, ListDatabasesOutput,
    ListTablesInput, ListTablesOutput, SchemaToolHandler,
};
pub use sports::{PlayerDetailsInput, SearchPlayersInput, SportsDataOutput, SportsToolHandler};
pub use stats::{
    FilterOptionsInput, FilterOptionsOutput, ListPlayersInput, MatchScorecardInput,
    MatchScorecardOutput, RecentMatchesInput, StatsToolHandler, TopPlayersInput,
};
pub use write::{
    ColumnValue, DeleteRowsInput, ExecuteUpdateInput, InsertRowInput, MutationOutput,
    WriteToolHandler,
};

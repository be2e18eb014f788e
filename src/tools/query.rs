//! Read tools.
//!
//! This module implements the `fetch_table` and `run_select` MCP tools. Both
//! return the rows together with the exact SQL that produced them.

use crate::db::Connector;
use crate::error::DashboardResult;
use crate::models::{QueryResult, RowLimit, RowLimitInput};
use crate::tools::context::{ToolContext, required_name};
use crate::tools::format::{OutputFormat, format_as_markdown, format_as_table};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Input for the fetch_table tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchTableInput {
    /// Database name. Defaults to the configured database.
    #[serde(default)]
    pub database: Option<String>,
    pub table: String,
    /// Maximum rows to return (an integer). Default: 200
    #[serde(default)]
    pub limit: Option<RowLimitInput>,
    /// Output format: "json" returns structured data, "table" returns ASCII table, "markdown" returns markdown table
    #[serde(default)]
    pub format: OutputFormat,
}

/// Input for the run_select tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RunSelectInput {
    /// Database name. Defaults to the configured database.
    #[serde(default)]
    pub database: Option<String>,
    /// Query text; must begin with SELECT
    pub sql: String,
    #[serde(default)]
    pub format: OutputFormat,
}

/// Output from the read tools.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryOutput {
    /// Column names. Empty if format is table/markdown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    /// Result rows as key-value maps. Empty if format is table/markdown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    /// Pre-formatted output when format is table or markdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    pub row_count: usize,
    /// The SQL that was executed
    pub sql: String,
    pub execution_time_ms: u64,
}

impl QueryOutput {
    pub fn from_result(result: QueryResult, format: OutputFormat, execution_time_ms: u64) -> Self {
        let row_count = result.row_count();
        let formatted = match format {
            OutputFormat::Json => None,
            OutputFormat::Table => Some(format_as_table(
                &result.columns,
                &result.rows,
                execution_time_ms,
            )),
            OutputFormat::Markdown => Some(format_as_markdown(&result.columns, &result.rows)),
        };

        match formatted {
            None => Self {
                columns: result.columns,
                rows: result.rows,
                formatted: None,
                row_count,
                sql: result.sql,
                execution_time_ms,
            },
            Some(text) => Self {
                columns: Vec::new(),
                rows: Vec::new(),
                formatted: Some(text),
                row_count,
                sql: result.sql,
                execution_time_ms,
            },
        }
    }
}

/// Handler for read tools.
pub struct QueryToolHandler<C> {
    context: Arc<ToolContext<C>>,
}

impl<C: Connector> QueryToolHandler<C> {
    pub fn new(context: Arc<ToolContext<C>>) -> Self {
        Self { context }
    }

    pub async fn fetch_table(&self, input: FetchTableInput) -> DashboardResult<QueryOutput> {
        let table = required_name(&input.table, "table")?;
        let limit = match input.limit {
            Some(limit) => RowLimit::try_from(limit)?,
            None => self.context.default_row_limit(),
        };
        let database = self.context.database(input.database.as_deref());

        let start = Instant::now();
        let result = self
            .context
            .executor
            .fetch_table(self.context.params(), database, table, limit)
            .await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            database = %database,
            table = %table,
            row_count = result.row_count(),
            execution_time_ms = execution_time_ms,
            "Table fetched"
        );
        Ok(QueryOutput::from_result(result, input.format, execution_time_ms))
    }

    pub async fn run_select(&self, input: RunSelectInput) -> DashboardResult<QueryOutput> {
        let database = self.context.database(input.database.as_deref());

        let start = Instant::now();
        let result = self
            .context
            .executor
            .run_select(self.context.params(), database, &input.sql)
            .await?;
        let execution_time_ms = start.elapsed().as_millis() as u64;

        info!(
            database = %database,
            row_count = result.row_count(),
            execution_time_ms = execution_time_ms,
            "Query executed"
        );
        Ok(QueryOutput::from_result(result, input.format, execution_time_ms))
    }
}

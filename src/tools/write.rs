//! Record management tools.
//!
//! This module implements the `insert_row`, `delete_rows` and
//! `execute_update` MCP tools. WHERE and SET fragments are passed to the
//! database verbatim; they are meant for the dashboard operator.

use crate::db::Connector;
use crate::error::DashboardResult;
use crate::models::{MutationResult, QueryParam};
use crate::tools::context::{ToolContext, required_name};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Instant;

/// One column assignment of an inserted row.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ColumnValue {
    pub column: String,
    /// Bound as a parameter, never inlined
    pub value: JsonValue,
}

/// Input for the insert_row tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InsertRowInput {
    /// Database name. Defaults to the configured database.
    #[serde(default)]
    pub database: Option<String>,
    pub table: String,
    /// Column values in insertion order
    pub values: Vec<ColumnValue>,
}

/// Input for the delete_rows tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteRowsInput {
    #[serde(default)]
    pub database: Option<String>,
    pub table: String,
    /// WHERE condition without the keyword, e.g. "id=5". Required.
    pub where_clause: String,
}

/// Input for the execute_update tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteUpdateInput {
    #[serde(default)]
    pub database: Option<String>,
    pub table: String,
    /// SET assignments without the keyword, e.g. "runs = runs + 10"
    pub set_clause: String,
    /// WHERE condition without the keyword. Required.
    pub where_clause: String,
}

/// Output from the record management tools.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MutationOutput {
    pub rows_affected: u64,
    /// The SQL that was executed
    pub sql: String,
    pub execution_time_ms: u64,
}

impl MutationOutput {
    fn new(result: MutationResult, start: Instant) -> Self {
        Self {
            rows_affected: result.affected_rows,
            sql: result.sql,
            execution_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

pub struct WriteToolHandler<C> {
    context: Arc<ToolContext<C>>,
}

impl<C: Connector> WriteToolHandler<C> {
    pub fn new(context: Arc<ToolContext<C>>) -> Self {
        Self { context }
    }

    pub async fn insert_row(&self, input: InsertRowInput) -> DashboardResult<MutationOutput> {
        let table = required_name(&input.table, "table")?;
        let database = self.context.database(input.database.as_deref());
        let values: Vec<(String, QueryParam)> = input
            .values
            .into_iter()
            .map(|cv| (cv.column, QueryParam::from_json(cv.value)))
            .collect();

        let start = Instant::now();
        let result = self
            .context
            .executor
            .insert_row(self.context.params(), database, table, &values)
            .await?;
        Ok(MutationOutput::new(result, start))
    }

    pub async fn delete_rows(&self, input: DeleteRowsInput) -> DashboardResult<MutationOutput> {
        let table = required_name(&input.table, "table")?;
        let database = self.context.database(input.database.as_deref());

        let start = Instant::now();
        let result = self
            .context
            .executor
            .delete_rows(self.context.params(), database, table, &input.where_clause)
            .await?;
        Ok(MutationOutput::new(result, start))
    }

    pub async fn execute_update(
        &self,
        input: ExecuteUpdateInput,
    ) -> DashboardResult<MutationOutput> {
        let table = required_name(&input.table, "table")?;
        let database = self.context.database(input.database.as_deref());

        let start = Instant::now();
        let result = self
            .context
            .executor
            .execute_update(
                self.context.params(),
                database,
                table,
                &input.set_clause,
                &input.where_clause,
            )
            .await?;
        Ok(MutationOutput::new(result, start))
    }
}

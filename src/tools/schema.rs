//! Schema discovery tools.
//!
//! This module implements the `discover_schema`, `list_databases`,
//! `list_tables` and `get_table_columns` MCP tools. Each call runs a fresh
//! discovery against the server.

use crate::db::Connector;
use crate::error::DashboardResult;
use crate::models::{ColumnInfo, Discovery, SchemaAccessFailure};
use crate::tools::context::{ToolContext, required_name};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Output for the discover_schema tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DiscoverSchemaOutput {
    #[serde(flatten)]
    pub discovery: Discovery,
    /// Number of databases discovered
    pub count: usize,
}

/// Output for the list_databases tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListDatabasesOutput {
    /// Sorted database names
    pub databases: Vec<String>,
    pub count: usize,
    /// Databases skipped because they could not be read
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SchemaAccessFailure>,
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTablesInput {
    /// Database name. Defaults to the configured database.
    #[serde(default)]
    pub database: Option<String>,
}

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    pub database: String,
    /// Sorted base table names; empty when the database is unknown
    pub tables: Vec<String>,
    pub count: usize,
}

/// Input for the get_table_columns tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetTableColumnsInput {
    /// Database name. Defaults to the configured database.
    #[serde(default)]
    pub database: Option<String>,
    pub table: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct GetTableColumnsOutput {
    pub database: String,
    pub table: String,
    /// Columns in declaration order; empty when the table is unknown
    pub columns: Vec<ColumnInfo>,
}

/// Handler for schema discovery tools.
pub struct SchemaToolHandler<C> {
    context: Arc<ToolContext<C>>,
}

impl<C: Connector> SchemaToolHandler<C> {
    pub fn new(context: Arc<ToolContext<C>>) -> Self {
        Self { context }
    }

    pub async fn discover_schema(&self) -> DashboardResult<DiscoverSchemaOutput> {
        let discovery = self.context.inspector.discover(self.context.params()).await?;
        info!(
            databases = discovery.schema.len(),
            failures = discovery.failures.len(),
            "Schema discovered"
        );
        Ok(DiscoverSchemaOutput {
            count: discovery.schema.len(),
            discovery,
        })
    }

    /// Failures are reported alongside the names, so a full discovery is used here.
    pub async fn list_databases(&self) -> DashboardResult<ListDatabasesOutput> {
        let discovery = self.context.inspector.discover(self.context.params()).await?;
        let databases = discovery.database_names();
        Ok(ListDatabasesOutput {
            count: databases.len(),
            databases,
            failures: discovery.failures,
        })
    }

    pub async fn list_tables(&self, input: ListTablesInput) -> DashboardResult<ListTablesOutput> {
        let database = self.context.database(input.database.as_deref());
        let tables = self
            .context
            .inspector
            .list_tables(self.context.params(), database)
            .await?;
        Ok(ListTablesOutput {
            database: database.to_string(),
            count: tables.len(),
            tables,
        })
    }

    pub async fn get_table_columns(
        &self,
        input: GetTableColumnsInput,
    ) -> DashboardResult<GetTableColumnsOutput> {
        let table = required_name(&input.table, "table")?;
        let database = self.context.database(input.database.as_deref());
        let columns = self
            .context
            .inspector
            .get_table_columns(self.context.params(), database, table)
            .await?;
        Ok(GetTableColumnsOutput {
            database: database.to_string(),
            table: table.to_string(),
            columns,
        })
    }
}

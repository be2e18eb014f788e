//! State shared by the database tool handlers.

use crate::db::{Connector, QueryExecutor, SchemaInspector};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{ConnectionParams, RowLimit};

/// Server settings plus the inspector and executor built on one connector.
#[derive(Debug)]
pub struct ToolContext<C> {
    params: ConnectionParams,
    default_database: String,
    default_row_limit: RowLimit,
    pub inspector: SchemaInspector<C>,
    pub executor: QueryExecutor<C>,
}

impl<C: Connector + Clone> ToolContext<C> {
    pub fn new(
        connector: C,
        params: ConnectionParams,
        default_database: impl Into<String>,
        default_row_limit: RowLimit,
    ) -> Self {
        Self {
            params,
            default_database: default_database.into(),
            default_row_limit,
            inspector: SchemaInspector::new(connector.clone()),
            executor: QueryExecutor::new(connector),
        }
    }
}

impl<C> ToolContext<C> {
    /// Server-level connection parameters.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn default_row_limit(&self) -> RowLimit {
        self.default_row_limit
    }

    /// The requested database, or the configured default when none is given.
    pub fn database<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|db| !db.is_empty())
            .unwrap_or(&self.default_database)
    }
}

/// Trim a required name argument, rejecting blank values.
pub fn required_name<'a>(value: &'a str, field: &str) -> DashboardResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation(format!("{} is required.", field)));
    }
    Ok(trimmed)
}

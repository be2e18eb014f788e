//! Schema discovery.
//!
//! Discovery walks every non-system database on the server and records its
//! base tables with their columns, plus view names. Each database gets its own
//! connection; a database that cannot be read is skipped and reported in
//! [`Discovery::failures`] without affecting the others.
//!
//! Nothing is cached: every call, including the derived helpers, runs a full
//! discovery against the server.

use crate::db::connector::{Connector, Session, TableKind};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    ColumnInfo, ConnectionParams, DatabaseStructure, Discovery, SchemaAccessFailure, ViewInfo,
    is_system_database,
};
use tracing::{debug, warn};

/// Schema inspector for database introspection.
#[derive(Debug, Clone)]
pub struct SchemaInspector<C> {
    connector: C,
}

impl<C: Connector> SchemaInspector<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Discover all user databases, their tables and columns.
    ///
    /// Fails only when the server-level connection or the database listing
    /// fails. `params.database` is ignored.
    pub async fn discover(&self, params: &ConnectionParams) -> DashboardResult<Discovery> {
        let server = params.server_level();
        let mut conn = self.connector.open(&server).await?;
        let databases = match conn.list_databases().await {
            Ok(databases) => databases,
            Err(e) => {
                conn.close().await;
                return Err(e);
            }
        };

        let mut discovery = Discovery::default();
        for database in databases.into_iter().filter(|db| !is_system_database(db)) {
            match self.inspect_database(&server, &database).await {
                Ok(Some(structure)) => {
                    discovery.schema.insert(database, structure);
                }
                Ok(None) => {
                    debug!(database = %database, "Skipping database without base tables");
                }
                Err(e) => {
                    warn!(database = %database, error = %e, "Skipping unreadable database");
                    discovery.failures.push(SchemaAccessFailure {
                        reason: e.to_string(),
                        database,
                    });
                }
            }
        }

        conn.close().await;
        debug!(
            databases = discovery.schema.len(),
            failures = discovery.failures.len(),
            "Schema discovery finished"
        );
        Ok(discovery)
    }

    /// Read one database over a dedicated connection.
    ///
    /// Returns `None` when the database has no base tables.
    async fn inspect_database(
        &self,
        server: &ConnectionParams,
        database: &str,
    ) -> DashboardResult<Option<DatabaseStructure>> {
        let scoped = server.clone().with_database(database);
        let mut conn = self
            .connector
            .open(&scoped)
            .await
            .map_err(|e| DashboardError::schema_access(database, e.to_string()))?;

        let result = read_structure(&mut conn, database).await;
        conn.close().await;
        result.map_err(|e| match e {
            DashboardError::SchemaAccess { .. } => e,
            other => DashboardError::schema_access(database, other.to_string()),
        })
    }

    /// Sorted names of all discovered databases.
    pub async fn list_databases(&self, params: &ConnectionParams) -> DashboardResult<Vec<String>> {
        Ok(self.discover(params).await?.database_names())
    }

    /// Sorted base table names of `database`; empty when it is unknown.
    pub async fn list_tables(
        &self,
        params: &ConnectionParams,
        database: &str,
    ) -> DashboardResult<Vec<String>> {
        Ok(self.discover(params).await?.table_names(database))
    }

    /// Ordered columns of `database.table`; empty when either is unknown.
    pub async fn get_table_columns(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
    ) -> DashboardResult<Vec<ColumnInfo>> {
        Ok(self.discover(params).await?.columns(database, table))
    }
}

async fn read_structure<S: Session>(
    conn: &mut S,
    database: &str,
) -> DashboardResult<Option<DatabaseStructure>> {
    let tables = conn.list_tables(TableKind::BaseTable).await?;
    if tables.is_empty() {
        return Ok(None);
    }

    let mut structure = DatabaseStructure::default();
    for table in tables {
        let columns = conn.table_columns(database, &table).await?;
        structure.tables.insert(table, columns);
    }
    for view in conn.list_tables(TableKind::View).await? {
        structure.views.insert(view, ViewInfo {});
    }

    debug!(
        database = %database,
        tables = structure.tables.len(),
        views = structure.views.len(),
        "Inspected database"
    );
    Ok(Some(structure))
}

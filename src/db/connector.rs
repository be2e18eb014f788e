//! Connection factory.
//!
//! Every operation opens its own connection, runs its statements in sequence
//! and closes the connection again. Nothing is pooled or shared between calls.
//!
//! The [`Connector`] and [`Session`] traits are the seam between the schema
//! inspector / query executor and the MySQL driver.

use crate::db::sql::Statement;
use crate::db::types::RowToJson;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{ColumnInfo, ConnectionParams, KeyRole, QueryParam};
use futures_util::TryStreamExt;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, MySql, Row};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Default time allowed for the connection handshake.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Kind of table-like object listed by [`Session::list_tables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    BaseTable,
    View,
}

impl TableKind {
    /// Value of `Table_type` in `SHOW FULL TABLES`.
    pub fn table_type(self) -> &'static str {
        match self {
            Self::BaseTable => "BASE TABLE",
            Self::View => "VIEW",
        }
    }
}

/// Rows returned by a statement, decoded to JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
}

/// Opens sessions against a database server.
pub trait Connector: Send + Sync {
    type Conn: Session;

    /// Open a connection, scoped to `params.database` when set.
    fn open(
        &self,
        params: &ConnectionParams,
    ) -> impl Future<Output = DashboardResult<Self::Conn>> + Send;
}

/// One open connection.
pub trait Session: Send + Sized {
    /// Names of all databases visible to the user.
    fn list_databases(&mut self) -> impl Future<Output = DashboardResult<Vec<String>>> + Send;

    /// Names of tables of the given kind in the session's database.
    fn list_tables(
        &mut self,
        kind: TableKind,
    ) -> impl Future<Output = DashboardResult<Vec<String>>> + Send;

    /// Column metadata of one table, in ordinal order.
    fn table_columns(
        &mut self,
        database: &str,
        table: &str,
    ) -> impl Future<Output = DashboardResult<Vec<ColumnInfo>>> + Send;

    fn fetch(&mut self, statement: &Statement)
    -> impl Future<Output = DashboardResult<RowSet>> + Send;

    /// Run a statement and return the affected row count.
    fn execute(&mut self, statement: &Statement)
    -> impl Future<Output = DashboardResult<u64>> + Send;

    fn close(self) -> impl Future<Output = ()> + Send;
}

mod queries {
    /// Run right after the handshake, before the session is handed out.
    pub const ENABLE_AUTOCOMMIT: &str = "SET autocommit = 1";

    pub const LIST_DATABASES: &str = "SHOW DATABASES";

    pub const TABLE_COLUMNS: &str = r#"
        SELECT
            CONVERT(COLUMN_NAME USING utf8) AS COLUMN_NAME,
            CONVERT(DATA_TYPE USING utf8) AS DATA_TYPE,
            CONVERT(IS_NULLABLE USING utf8) AS IS_NULLABLE,
            CONVERT(COLUMN_KEY USING utf8) AS COLUMN_KEY,
            CONVERT(COLUMN_DEFAULT USING utf8) AS COLUMN_DEFAULT,
            CONVERT(EXTRA USING utf8) AS EXTRA
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
        "#;

    pub fn list_tables(table_type: &str) -> String {
        format!("SHOW FULL TABLES WHERE Table_type = '{}'", table_type)
    }
}

/// Connector for a MySQL server over TCP.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    connect_timeout: Duration,
}

impl MySqlConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for MySqlConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
    }
}

/// Build driver options from connection parameters.
fn connect_options(params: &ConnectionParams) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(params.resolved_host())
        .username(&params.user)
        .password(params.password())
        .charset("utf8mb4");
    if let Some(port) = params.resolved_port() {
        options = options.port(port);
    }
    if let Some(database) = params.database.as_deref() {
        options = options.database(database);
    }
    options
}

impl Connector for MySqlConnector {
    type Conn = MySqlSession;

    async fn open(&self, params: &ConnectionParams) -> DashboardResult<MySqlSession> {
        let options = connect_options(params);
        debug!(
            host = %params.resolved_host(),
            database = ?params.database,
            "Opening MySQL connection"
        );

        match timeout(self.connect_timeout, options.connect()).await {
            Ok(Ok(mut conn)) => {
                if let Err(e) = (&mut conn).execute(queries::ENABLE_AUTOCOMMIT).await {
                    let _ = conn.close().await;
                    return Err(DashboardError::connection(
                        format!("Failed to enable autocommit: {}", e),
                        "Check that the user may change session variables",
                    ));
                }
                Ok(MySqlSession { conn })
            }
            Ok(Err(e)) => Err(DashboardError::connection(
                format!("Failed to connect to {}: {}", params.resolved_host(), e),
                "Check the host, port and credentials",
            )),
            Err(_) => Err(DashboardError::timeout(
                "connect",
                self.connect_timeout.as_secs() as u32,
            )),
        }
    }
}

/// An open MySQL connection. Statements run in autocommit mode.
pub struct MySqlSession {
    conn: MySqlConnection,
}

/// Safely get a string from a MySQL row by column name.
/// Catalog columns may come back as VARBINARY depending on charset configuration.
fn get_string(row: &MySqlRow, column: &str) -> String {
    get_optional_string(row, column).unwrap_or_default()
}

fn get_optional_string(row: &MySqlRow, column: &str) -> Option<String> {
    row.try_get::<Option<String>, _>(column)
        .ok()
        .flatten()
        .or_else(|| {
            row.try_get::<Option<Vec<u8>>, _>(column)
                .ok()
                .flatten()
                .and_then(|bytes| String::from_utf8(bytes).ok())
        })
}

fn get_string_by_index(row: &MySqlRow, index: usize) -> Option<String> {
    row.try_get::<String, _>(index).ok().or_else(|| {
        row.try_get::<Vec<u8>, _>(index)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    })
}

fn bind_param<'q>(
    query: sqlx::query::Query<'q, MySql, MySqlArguments>,
    param: &'q QueryParam,
) -> sqlx::query::Query<'q, MySql, MySqlArguments> {
    match param {
        QueryParam::Null => query.bind(None::<String>),
        QueryParam::Bool(v) => query.bind(*v),
        QueryParam::Int(v) => query.bind(*v),
        QueryParam::Float(v) => query.bind(*v),
        QueryParam::String(v) => query.bind(v.as_str()),
    }
}

fn column_from_row(row: &MySqlRow) -> ColumnInfo {
    let mut column = ColumnInfo::new(get_string(row, "COLUMN_NAME"), get_string(row, "DATA_TYPE"))
        .with_nullable(get_string(row, "IS_NULLABLE").eq_ignore_ascii_case("YES"))
        .with_key_role(KeyRole::from_column_key(&get_string(row, "COLUMN_KEY")))
        .with_extra(get_string(row, "EXTRA"));
    if let Some(default) = get_optional_string(row, "COLUMN_DEFAULT") {
        column = column.with_default(default);
    }
    column
}

impl MySqlSession {
    /// Result column names of a statement, taken from the prepared metadata.
    async fn describe_columns(&mut self, sql: &str) -> Vec<String> {
        match (&mut self.conn).describe(sql).await {
            Ok(described) => described
                .columns()
                .iter()
                .map(|col| col.name().to_string())
                .collect(),
            Err(e) => {
                debug!(error = %e, "Could not describe statement");
                Vec::new()
            }
        }
    }

    async fn first_column(&mut self, sql: &str) -> DashboardResult<Vec<String>> {
        let rows: Vec<MySqlRow> = (&mut self.conn).fetch(sql).try_collect().await?;
        Ok(rows
            .iter()
            .filter_map(|row| get_string_by_index(row, 0))
            .collect())
    }
}

impl Session for MySqlSession {
    async fn list_databases(&mut self) -> DashboardResult<Vec<String>> {
        let databases = self.first_column(queries::LIST_DATABASES).await?;
        debug!(count = databases.len(), "Listed MySQL databases");
        Ok(databases)
    }

    async fn list_tables(&mut self, kind: TableKind) -> DashboardResult<Vec<String>> {
        self.first_column(&queries::list_tables(kind.table_type()))
            .await
    }

    async fn table_columns(
        &mut self,
        database: &str,
        table: &str,
    ) -> DashboardResult<Vec<ColumnInfo>> {
        let rows: Vec<MySqlRow> = sqlx::query(queries::TABLE_COLUMNS)
            .bind(database)
            .bind(table)
            .fetch(&mut self.conn)
            .try_collect()
            .await?;
        Ok(rows.iter().map(column_from_row).collect())
    }

    async fn fetch(&mut self, statement: &Statement) -> DashboardResult<RowSet> {
        debug!(sql = %statement.sql, params = statement.params.len(), "Executing query");

        // Without params, send plain text so any statement form is accepted
        let rows: Vec<MySqlRow> = if statement.params.is_empty() {
            (&mut self.conn)
                .fetch(statement.driver_sql.as_str())
                .try_collect()
                .await?
        } else {
            let mut query = sqlx::query(&statement.driver_sql);
            for param in &statement.params {
                query = bind_param(query, param);
            }
            query.fetch(&mut self.conn).try_collect().await?
        };

        // An empty result still reports its column header
        let columns = match rows.first() {
            Some(row) => row.column_names(),
            None => self.describe_columns(&statement.driver_sql).await,
        };
        Ok(RowSet {
            columns,
            rows: rows.iter().map(RowToJson::to_json_map).collect(),
        })
    }

    async fn execute(&mut self, statement: &Statement) -> DashboardResult<u64> {
        debug!(sql = %statement.sql, params = statement.params.len(), "Executing write");

        let result = if statement.params.is_empty() {
            (&mut self.conn)
                .execute(statement.driver_sql.as_str())
                .await?
        } else {
            let mut query = sqlx::query(&statement.driver_sql);
            for param in &statement.params {
                query = bind_param(query, param);
            }
            query.execute(&mut self.conn).await?
        };
        Ok(result.rows_affected())
    }

    async fn close(self) {
        if let Err(e) = self.conn.close().await {
            debug!(error = %e, "Error while closing MySQL connection");
        }
    }
}

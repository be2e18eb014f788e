//! Query executors.
//!
//! Each operation validates its input, opens one connection scoped to the
//! target database, runs a single statement and closes the connection. The
//! SQL text that was executed is returned with every result.
//!
//! Validation failures are raised before a connection is opened.

use crate::db::connector::{Connector, RowSet, Session};
use crate::db::sql::{self, Statement};
use crate::error::DashboardResult;
use crate::models::{
    ConnectionParams, MatchFilter, MutationResult, PlayerFilter, QueryParam, QueryResult, RowLimit,
    Specialty,
};
use tracing::info;

/// Query executor for reads and single-statement writes.
#[derive(Debug, Clone)]
pub struct QueryExecutor<C> {
    connector: C,
}

impl<C: Connector> QueryExecutor<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Preview up to `limit` rows of a table.
    pub async fn fetch_table(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
        limit: RowLimit,
    ) -> DashboardResult<QueryResult> {
        let statement = sql::fetch_table(table, limit);
        self.fetch(params, database, statement).await
    }

    /// Run a caller-supplied read-only query.
    pub async fn run_select(
        &self,
        params: &ConnectionParams,
        database: &str,
        select_sql: &str,
    ) -> DashboardResult<QueryResult> {
        let statement = sql::select(select_sql)?;
        self.fetch(params, database, statement).await
    }

    /// Insert one row; `values` keeps the caller's column order.
    pub async fn insert_row(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
        values: &[(String, QueryParam)],
    ) -> DashboardResult<MutationResult> {
        let statement = sql::insert_row(table, values)?;
        self.execute(params, database, table, statement).await
    }

    pub async fn delete_rows(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
        where_clause: &str,
    ) -> DashboardResult<MutationResult> {
        let statement = sql::delete_rows(table, where_clause)?;
        self.execute(params, database, table, statement).await
    }

    pub async fn execute_update(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
        set_clause: &str,
        where_clause: &str,
    ) -> DashboardResult<MutationResult> {
        let statement = sql::update_rows(table, set_clause, where_clause)?;
        self.execute(params, database, table, statement).await
    }

    /// Sorted non-null values of one column.
    pub async fn distinct_values(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
        column: &str,
    ) -> DashboardResult<QueryResult> {
        let statement = sql::distinct_values(table, column);
        self.fetch(params, database, statement).await
    }

    pub async fn recent_matches(
        &self,
        params: &ConnectionParams,
        database: &str,
        filter: &MatchFilter,
    ) -> DashboardResult<QueryResult> {
        self.fetch(params, database, sql::recent_matches(filter))
            .await
    }

    /// Batting and bowling cards of one match, read over a single connection.
    pub async fn match_scorecard(
        &self,
        params: &ConnectionParams,
        database: &str,
        match_id: i64,
    ) -> DashboardResult<(QueryResult, QueryResult)> {
        let batting = sql::batting_scorecard(match_id);
        let bowling = sql::bowling_scorecard(match_id);

        let mut conn = self.connector.open(&scoped(params, database)).await?;
        let batting_rows = conn.fetch(&batting).await;
        let bowling_rows = if batting_rows.is_ok() {
            conn.fetch(&bowling).await
        } else {
            Ok(RowSet::default())
        };
        conn.close().await;

        Ok((
            into_result(batting_rows?, batting),
            into_result(bowling_rows?, bowling),
        ))
    }

    pub async fn players(
        &self,
        params: &ConnectionParams,
        database: &str,
        filter: &PlayerFilter,
    ) -> DashboardResult<QueryResult> {
        self.fetch(params, database, sql::players(filter)).await
    }

    pub async fn top_players(
        &self,
        params: &ConnectionParams,
        database: &str,
        specialty: Specialty,
    ) -> DashboardResult<QueryResult> {
        self.fetch(params, database, sql::top_players(specialty))
            .await
    }

    async fn fetch(
        &self,
        params: &ConnectionParams,
        database: &str,
        statement: Statement,
    ) -> DashboardResult<QueryResult> {
        let mut conn = self.connector.open(&scoped(params, database)).await?;
        let result = conn.fetch(&statement).await;
        conn.close().await;

        Ok(into_result(result?, statement))
    }

    async fn execute(
        &self,
        params: &ConnectionParams,
        database: &str,
        table: &str,
        statement: Statement,
    ) -> DashboardResult<MutationResult> {
        let mut conn = self.connector.open(&scoped(params, database)).await?;
        let result = conn.execute(&statement).await;
        conn.close().await;

        let affected_rows = result?;
        info!(
            database = %database,
            table = %table,
            affected = affected_rows,
            sql = %statement.sql,
            "Mutation executed"
        );
        Ok(MutationResult {
            affected_rows,
            sql: statement.sql,
        })
    }
}

fn into_result(rows: RowSet, statement: Statement) -> QueryResult {
    QueryResult {
        columns: rows.columns,
        rows: rows.rows,
        sql: statement.sql,
    }
}

fn scoped(params: &ConnectionParams, database: &str) -> ConnectionParams {
    params.clone().with_database(database)
}

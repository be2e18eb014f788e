//! In-memory MySQL stand-in shared by the integration tests.

#![allow(dead_code)]

use cricket_dashboard::DashboardError;
use cricket_dashboard::DashboardResult;
use cricket_dashboard::db::{Connector, RowSet, Session, Statement, TableKind};
use cricket_dashboard::models::{ColumnInfo, ConnectionParams, KeyRole};
use serde_json::{Map, Value as JsonValue};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct FakeDatabase {
    pub name: String,
    pub tables: Vec<(String, Vec<ColumnInfo>)>,
    pub views: Vec<String>,
}

impl FakeDatabase {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn table(mut self, name: &str, columns: Vec<ColumnInfo>) -> Self {
        self.tables.push((name.to_string(), columns));
        self
    }

    pub fn view(mut self, name: &str) -> Self {
        self.views.push(name.to_string());
        self
    }
}

/// What the fake server contains and how it misbehaves.
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    /// In `SHOW DATABASES` order
    pub databases: Vec<FakeDatabase>,
    /// Databases whose connection is refused
    pub denied: HashSet<String>,
    pub fail_listing: bool,
    /// Every fetch and execute fails with a missing-table error
    pub fail_statements: bool,
    /// Databases whose column lookups fail after the connection opened
    pub unreadable_columns: HashSet<String>,
    pub rows: RowSet,
    pub affected_rows: u64,
}

impl FakeServer {
    pub fn database(mut self, database: FakeDatabase) -> Self {
        self.databases.push(database);
        self
    }

    pub fn deny(mut self, database: &str) -> Self {
        self.denied.insert(database.to_string());
        self
    }

    pub fn fail_statements(mut self) -> Self {
        self.fail_statements = true;
        self
    }

    pub fn unreadable_columns(mut self, database: &str) -> Self {
        self.unreadable_columns.insert(database.to_string());
        self
    }

    pub fn rows(mut self, columns: &[&str], rows: Vec<JsonValue>) -> Self {
        self.rows = RowSet {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|row| match row {
                    JsonValue::Object(map) => map,
                    _ => Map::new(),
                })
                .collect(),
        };
        self
    }

    pub fn affected_rows(mut self, affected: u64) -> Self {
        self.affected_rows = affected;
        self
    }

    fn find(&self, name: &str) -> Option<&FakeDatabase> {
        self.databases.iter().find(|db| db.name == name)
    }
}

/// Everything the connector was asked to do.
#[derive(Debug, Default)]
pub struct Journal {
    /// Database scope of each opened connection, `None` for server level
    pub opened: Vec<Option<String>>,
    pub closed: usize,
    pub fetched: Vec<Statement>,
    pub executed: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct FakeConnector {
    server: Arc<FakeServer>,
    journal: Arc<Mutex<Journal>>,
}

impl FakeConnector {
    pub fn new(server: FakeServer) -> Self {
        Self {
            server: Arc::new(server),
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    pub fn opened(&self) -> Vec<Option<String>> {
        self.journal.lock().unwrap().opened.clone()
    }

    pub fn closed(&self) -> usize {
        self.journal.lock().unwrap().closed
    }

    pub fn fetched(&self) -> Vec<Statement> {
        self.journal.lock().unwrap().fetched.clone()
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.journal.lock().unwrap().executed.clone()
    }
}

impl Connector for FakeConnector {
    type Conn = FakeSession;

    async fn open(&self, params: &ConnectionParams) -> DashboardResult<FakeSession> {
        let database = params.database.clone().unwrap_or_default();
        if self.server.denied.contains(&database) {
            return Err(DashboardError::database(
                format!("Access denied for user '{}' to database '{}'", params.user, database),
                Some("42000".to_string()),
                "Check the user's privileges",
            ));
        }
        self.journal
            .lock()
            .unwrap()
            .opened
            .push(params.database.clone());
        Ok(FakeSession {
            database: params.database.clone(),
            server: self.server.clone(),
            journal: self.journal.clone(),
        })
    }
}

pub struct FakeSession {
    database: Option<String>,
    server: Arc<FakeServer>,
    journal: Arc<Mutex<Journal>>,
}

impl FakeSession {
    fn statement_outcome(&self) -> DashboardResult<()> {
        if self.server.fail_statements {
            return Err(DashboardError::database(
                "Table 'cricbuzz_data.players' doesn't exist",
                Some("42S02".to_string()),
                "Check the table name",
            ));
        }
        Ok(())
    }
}

impl Session for FakeSession {
    async fn list_databases(&mut self) -> DashboardResult<Vec<String>> {
        if self.server.fail_listing {
            return Err(DashboardError::database(
                "Lost connection to MySQL server during query",
                None,
                "Check that the database server is running",
            ));
        }
        Ok(self.server.databases.iter().map(|db| db.name.clone()).collect())
    }

    async fn list_tables(&mut self, kind: TableKind) -> DashboardResult<Vec<String>> {
        let Some(db) = self.database.as_deref().and_then(|name| self.server.find(name)) else {
            return Err(DashboardError::database(
                "No database selected",
                Some("3D000".to_string()),
                "Connect with a database",
            ));
        };
        Ok(match kind {
            TableKind::BaseTable => db.tables.iter().map(|(name, _)| name.clone()).collect(),
            TableKind::View => db.views.clone(),
        })
    }

    async fn table_columns(
        &mut self,
        database: &str,
        table: &str,
    ) -> DashboardResult<Vec<ColumnInfo>> {
        if self.server.unreadable_columns.contains(database) {
            return Err(DashboardError::database(
                format!("SELECT command denied to user 'root' for table '{}'", table),
                Some("42000".to_string()),
                "Check the user's privileges",
            ));
        }
        Ok(self
            .server
            .find(database)
            .and_then(|db| db.tables.iter().find(|(name, _)| name == table))
            .map(|(_, columns)| columns.clone())
            .unwrap_or_default())
    }

    async fn fetch(&mut self, statement: &Statement) -> DashboardResult<RowSet> {
        self.journal.lock().unwrap().fetched.push(statement.clone());
        self.statement_outcome()?;
        Ok(self.server.rows.clone())
    }

    async fn execute(&mut self, statement: &Statement) -> DashboardResult<u64> {
        self.journal.lock().unwrap().executed.push(statement.clone());
        self.statement_outcome()?;
        Ok(self.server.affected_rows)
    }

    async fn close(self) {
        self.journal.lock().unwrap().closed += 1;
    }
}

pub fn params() -> ConnectionParams {
    ConnectionParams::new("localhost", "root", "secret")
}

/// A server holding the usual cricket tables plus the MySQL system schemas.
pub fn cricket_server() -> FakeServer {
    FakeServer::default()
        .database(FakeDatabase::new("information_schema").table(
            "TABLES",
            vec![ColumnInfo::new("TABLE_NAME", "varchar")],
        ))
        .database(
            FakeDatabase::new("cricbuzz_data")
                .table(
                    "players",
                    vec![
                        ColumnInfo::new("id", "int")
                            .with_nullable(false)
                            .with_key_role(KeyRole::Primary)
                            .with_extra("auto_increment"),
                        ColumnInfo::new("name", "varchar").with_nullable(false),
                        ColumnInfo::new("country", "varchar").with_key_role(KeyRole::Multiple),
                        ColumnInfo::new("runs", "int").with_default("0"),
                    ],
                )
                .table(
                    "matches",
                    vec![
                        ColumnInfo::new("match_id", "bigint").with_key_role(KeyRole::Primary),
                        ColumnInfo::new("venue", "varchar"),
                    ],
                )
                .view("top_scorers"),
        )
        .database(FakeDatabase::new("mysql").table("user", vec![ColumnInfo::new("User", "char")]))
        .database(FakeDatabase::new("archive"))
        .database(
            FakeDatabase::new("analytics").table("rankings", vec![ColumnInfo::new("rank", "int")]),
        )
        .database(FakeDatabase::new("performance_schema").table(
            "threads",
            vec![ColumnInfo::new("THREAD_ID", "bigint")],
        ))
        .database(
            FakeDatabase::new("sys")
                .table("version", vec![ColumnInfo::new("mysql_version", "varchar")]),
        )
}

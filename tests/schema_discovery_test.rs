//! Integration tests for schema discovery.
//!
//! These run the schema inspector against an in-memory server and check
//! which databases are reported, in what shape, and how unreadable
//! databases are handled.

mod common;

use common::{FakeConnector, FakeDatabase, FakeServer, cricket_server, params};
use cricket_dashboard::DashboardError;
use cricket_dashboard::db::SchemaInspector;
use cricket_dashboard::models::{ColumnInfo, EXCLUDED_DATABASES, KeyRole};
use tokio_test::{assert_err, assert_ok};

fn inspector(server: FakeServer) -> (SchemaInspector<FakeConnector>, FakeConnector) {
    let connector = FakeConnector::new(server);
    (SchemaInspector::new(connector.clone()), connector)
}

#[tokio::test]
async fn test_discovery_excludes_system_databases() {
    let (inspector, _) = inspector(cricket_server());
    let discovery = assert_ok!(inspector.discover(&params()).await);

    for excluded in EXCLUDED_DATABASES {
        assert!(
            !discovery.schema.contains_key(excluded),
            "{} should not be discovered",
            excluded
        );
    }
    assert_eq!(discovery.database_names(), vec!["analytics", "cricbuzz_data"]);
}

#[tokio::test]
async fn test_system_database_names_match_exactly() {
    let server = FakeServer::default()
        .database(FakeDatabase::new("sys").table("version", vec![ColumnInfo::new("v", "varchar")]))
        .database(FakeDatabase::new("Sys").table("teams", vec![ColumnInfo::new("id", "int")]))
        .database(
            FakeDatabase::new("MySQL_Stats").table("teams", vec![ColumnInfo::new("id", "int")]),
        );
    let (inspector, _) = inspector(server);

    let discovery = assert_ok!(inspector.discover(&params()).await);
    assert_eq!(discovery.database_names(), vec!["MySQL_Stats", "Sys"]);
}

#[tokio::test]
async fn test_database_without_tables_is_omitted() {
    let (inspector, _) = inspector(cricket_server());
    let discovery = assert_ok!(inspector.discover(&params()).await);

    assert!(!discovery.schema.contains_key("archive"));
    assert!(discovery.failures.is_empty());
}

#[tokio::test]
async fn test_columns_keep_ordinal_order() {
    let (inspector, _) = inspector(cricket_server());
    let first = assert_ok!(inspector.discover(&params()).await);
    let second = assert_ok!(inspector.discover(&params()).await);

    let names: Vec<_> = first
        .columns("cricbuzz_data", "players")
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["id", "name", "country", "runs"]);
    assert_eq!(
        first.columns("cricbuzz_data", "players"),
        second.columns("cricbuzz_data", "players")
    );
}

#[tokio::test]
async fn test_column_metadata_is_preserved() {
    let (inspector, _) = inspector(cricket_server());
    let discovery = assert_ok!(inspector.discover(&params()).await);
    let columns = discovery.columns("cricbuzz_data", "players");

    assert_eq!(columns[0].key_role, KeyRole::Primary);
    assert!(!columns[0].nullable);
    assert_eq!(columns[0].extra, "auto_increment");
    assert_eq!(columns[2].key_role, KeyRole::Multiple);
    assert_eq!(columns[3].default_value.as_deref(), Some("0"));
    assert!(columns[3].nullable);
}

#[tokio::test]
async fn test_views_are_recorded() {
    let (inspector, _) = inspector(cricket_server());
    let discovery = assert_ok!(inspector.discover(&params()).await);
    let structure = &discovery.schema["cricbuzz_data"];

    assert!(structure.views.contains_key("top_scorers"));
    assert!(!structure.tables.contains_key("top_scorers"));
    assert!(structure.functions.is_empty());
    assert!(structure.procedures.is_empty());
}

#[tokio::test]
async fn test_inaccessible_database_does_not_hide_others() {
    let (inspector, _) = inspector(cricket_server().deny("analytics"));
    let discovery = assert_ok!(inspector.discover(&params()).await);

    assert_eq!(discovery.database_names(), vec!["cricbuzz_data"]);
    assert_eq!(
        discovery.table_names("cricbuzz_data"),
        vec!["matches", "players"]
    );
    assert_eq!(discovery.columns("cricbuzz_data", "matches").len(), 2);

    assert_eq!(discovery.failures.len(), 1);
    assert_eq!(discovery.failures[0].database, "analytics");
    assert!(discovery.failures[0].reason.contains("Access denied"));
}

#[tokio::test]
async fn test_column_failure_after_open_is_reported() {
    let (inspector, connector) = inspector(cricket_server().unreadable_columns("analytics"));
    let discovery = assert_ok!(inspector.discover(&params()).await);

    assert_eq!(discovery.database_names(), vec!["cricbuzz_data"]);
    assert_eq!(discovery.failures.len(), 1);
    assert_eq!(discovery.failures[0].database, "analytics");
    assert!(discovery.failures[0].reason.contains("SELECT command denied"));

    assert!(connector.opened().contains(&Some("analytics".to_string())));
    assert_eq!(connector.opened().len(), connector.closed());
}

#[tokio::test]
async fn test_listing_failure_is_an_error() {
    let server = FakeServer {
        fail_listing: true,
        ..cricket_server()
    };
    let (inspector, connector) = inspector(server);

    let err = assert_err!(inspector.discover(&params()).await);
    assert!(matches!(err, DashboardError::Database { .. }));
    assert_eq!(connector.opened().len(), connector.closed());
}

#[tokio::test]
async fn test_every_connection_is_closed() {
    let (inspector, connector) = inspector(cricket_server().deny("analytics"));
    assert_ok!(inspector.discover(&params()).await);

    let opened = connector.opened();
    assert_eq!(opened.first(), Some(&None), "first connection is server level");
    assert!(opened.contains(&Some("cricbuzz_data".to_string())));
    assert!(!opened.contains(&Some("mysql".to_string())));
    assert_eq!(opened.len(), connector.closed());
}

#[tokio::test]
async fn test_discovery_ignores_configured_database() {
    let (inspector, connector) = inspector(cricket_server());
    let scoped = params().with_database("cricbuzz_data");

    let discovery = assert_ok!(inspector.discover(&scoped).await);
    assert_eq!(discovery.database_names().len(), 2);
    assert_eq!(connector.opened().first(), Some(&None));
}

#[tokio::test]
async fn test_list_databases_is_sorted_and_stable() {
    let (inspector, _) = inspector(cricket_server());
    let first = assert_ok!(inspector.list_databases(&params()).await);
    let second = assert_ok!(inspector.list_databases(&params()).await);

    assert_eq!(first, vec!["analytics", "cricbuzz_data"]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_tables_of_unknown_database_is_empty() {
    let (inspector, _) = inspector(cricket_server());

    let tables = assert_ok!(inspector.list_tables(&params(), "cricbuzz_data").await);
    assert_eq!(tables, vec!["matches", "players"]);

    let tables = assert_ok!(inspector.list_tables(&params(), "no_such_db").await);
    assert!(tables.is_empty());

    let tables = assert_ok!(inspector.list_tables(&params(), "mysql").await);
    assert!(tables.is_empty());
}

#[tokio::test]
async fn test_get_table_columns_of_unknown_table_is_empty() {
    let (inspector, _) = inspector(cricket_server());

    let columns = assert_ok!(
        inspector
            .get_table_columns(&params(), "cricbuzz_data", "matches")
            .await
    );
    assert_eq!(columns[0].name, "match_id");

    let columns = assert_ok!(
        inspector
            .get_table_columns(&params(), "cricbuzz_data", "umpires")
            .await
    );
    assert!(columns.is_empty());
}

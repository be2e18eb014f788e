//! Integration tests for the dashboard view tools.
//!
//! These check the SQL each view sends, that every filter value is bound,
//! and that "All" or blank filters drop their condition.

mod common;

use common::{FakeConnector, cricket_server, params};
use cricket_dashboard::db::QueryExecutor;
use cricket_dashboard::models::{MatchFilter, QueryParam, RowLimit, Specialty};
use cricket_dashboard::tools::{
    FilterOptionsInput, ListPlayersInput, MatchScorecardInput, OutputFormat, RecentMatchesInput,
    StatsToolHandler, ToolContext, TopPlayersInput,
};
use serde_json::json;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

fn handler(connector: &FakeConnector) -> StatsToolHandler<FakeConnector> {
    let context = ToolContext::new(
        connector.clone(),
        params(),
        "cricbuzz_data",
        RowLimit::new(50),
    );
    StatsToolHandler::new(Arc::new(context))
}

fn format_rows() -> FakeConnector {
    FakeConnector::new(cricket_server().rows(
        &["match_format"],
        vec![
            json!({"match_format": "ODI"}),
            json!({"match_format": null}),
            json!({"match_format": "T20"}),
        ],
    ))
}

#[tokio::test]
async fn test_filter_options_returns_column_values() {
    let connector = format_rows();
    let output = assert_ok!(
        handler(&connector)
            .filter_options(FilterOptionsInput {
                database: None,
                table: "recent_matches".to_string(),
                column: "match_format".to_string(),
            })
            .await
    );

    assert_eq!(output.values, vec![json!("ODI"), json!("T20")]);
    assert_eq!(output.count, 2);
    assert_eq!(
        output.sql,
        "SELECT DISTINCT `match_format` FROM `recent_matches` \
         WHERE `match_format` IS NOT NULL ORDER BY `match_format`;"
    );
    assert_eq!(connector.opened(), vec![Some("cricbuzz_data".to_string())]);
    assert_eq!(connector.closed(), 1);
}

#[tokio::test]
async fn test_filter_options_quotes_identifiers() {
    let connector = format_rows();
    let output = assert_ok!(
        handler(&connector)
            .filter_options(FilterOptionsInput {
                database: Some("analytics".to_string()),
                table: "players".to_string(),
                column: "country` FROM users; --".to_string(),
            })
            .await
    );
    assert!(output.sql.starts_with("SELECT DISTINCT `country`` FROM users; --` FROM `players`"));
}

#[tokio::test]
async fn test_filter_options_rejects_blank_table() {
    let connector = format_rows();
    let err = assert_err!(
        handler(&connector)
            .filter_options(FilterOptionsInput {
                database: None,
                table: "".to_string(),
                column: "state".to_string(),
            })
            .await
    );
    assert!(err.is_validation());
    assert!(connector.opened().is_empty());
}

#[tokio::test]
async fn test_recent_matches_binds_filters() {
    let connector = FakeConnector::new(cricket_server());
    let output = assert_ok!(
        handler(&connector)
            .recent_matches(RecentMatchesInput {
                match_format: Some("T20".to_string()),
                state: Some("Complete".to_string()),
                ..Default::default()
            })
            .await
    );

    assert!(output.sql.contains("AND match_format = %s AND state = %s"));
    let fetched = connector.fetched();
    assert!(fetched[0].driver_sql.contains("AND match_format = ? AND state = ?"));
    assert!(fetched[0].driver_sql.ends_with("ORDER BY match_id DESC LIMIT 50;"));
    assert_eq!(
        fetched[0].params,
        vec![QueryParam::from("T20"), QueryParam::from("Complete")]
    );
}

#[tokio::test]
async fn test_recent_matches_all_means_unfiltered() {
    let connector = FakeConnector::new(cricket_server());
    assert_ok!(
        handler(&connector)
            .recent_matches(RecentMatchesInput {
                match_format: Some("All".to_string()),
                state: Some(" ".to_string()),
                ..Default::default()
            })
            .await
    );

    let fetched = connector.fetched();
    assert!(fetched[0].params.is_empty());
    assert!(fetched[0].sql.contains("FROM recent_matches WHERE 1=1 ORDER BY"));
}

#[tokio::test]
async fn test_match_scorecard_uses_one_connection() {
    let connector = FakeConnector::new(cricket_server().rows(
        &["player_name", "runs"],
        vec![json!({"player_name": "Gill", "runs": 112})],
    ));
    let output = assert_ok!(
        handler(&connector)
            .match_scorecard(MatchScorecardInput {
                database: None,
                match_id: 74648,
                format: OutputFormat::Json,
            })
            .await
    );

    assert_eq!(output.match_id, 74648);
    assert!(output.batting.sql.contains("FROM batters_bat_data"));
    assert!(output.bowling.sql.contains("FROM bowlers_bow_v_data"));

    let fetched = connector.fetched();
    assert_eq!(fetched.len(), 2);
    assert!(fetched.iter().all(|s| s.params == vec![QueryParam::Int(74648)]));
    assert_eq!(connector.opened().len(), 1);
    assert_eq!(connector.closed(), 1);
}

#[tokio::test]
async fn test_match_scorecard_error_stops_after_batting() {
    let connector = FakeConnector::new(cricket_server().fail_statements());
    let executor = QueryExecutor::new(connector.clone());

    let err = assert_err!(executor.match_scorecard(&params(), "cricbuzz_data", 1).await);
    assert!(err.to_string().contains("doesn't exist"));
    assert_eq!(connector.fetched().len(), 1);
    assert_eq!(connector.closed(), 1);
}

#[tokio::test]
async fn test_list_players_name_is_partial_match() {
    let connector = FakeConnector::new(cricket_server());
    let output = assert_ok!(
        handler(&connector)
            .list_players(ListPlayersInput {
                name: Some(" Sharma ".to_string()),
                country: Some("All".to_string()),
                playing_role: Some("Batsman".to_string()),
                ..Default::default()
            })
            .await
    );

    assert!(output.sql.contains("AND (name LIKE %s) AND playing_role = %s"));
    assert!(!output.sql.contains("country ="));
    assert!(output.sql.ends_with("LIMIT 100;"));
    assert_eq!(
        connector.fetched()[0].params,
        vec![QueryParam::from("%Sharma%"), QueryParam::from("Batsman")]
    );
}

#[tokio::test]
async fn test_top_players_by_specialty() {
    let connector = FakeConnector::new(cricket_server());
    let handler = handler(&connector);

    let output = assert_ok!(
        handler
            .top_players(TopPlayersInput {
                specialty: Specialty::Bowling,
                format: OutputFormat::Markdown,
                ..Default::default()
            })
            .await
    );
    assert!(output.sql.contains("bowling_style IS NOT NULL"));
    assert!(output.sql.ends_with("LIMIT 20;"));
    assert!(output.formatted.is_some());

    let output = assert_ok!(handler.top_players(TopPlayersInput::default()).await);
    assert!(output.sql.contains("batting_style IS NOT NULL"));
}

#[tokio::test]
async fn test_views_use_named_database() {
    let connector = FakeConnector::new(cricket_server());
    let executor = QueryExecutor::new(connector.clone());

    assert_ok!(
        executor
            .recent_matches(&params(), "analytics", &MatchFilter::default())
            .await
    );
    assert_eq!(connector.opened(), vec![Some("analytics".to_string())]);
}

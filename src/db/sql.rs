//! Statement construction.
//!
//! Every executor statement is rendered twice from the same parts: once with
//! `%s` placeholders for display, and once with `?` placeholders for the MySQL
//! driver. Both renderings come from the same structure, so they can never
//! disagree on which values are bound where.

use crate::error::{DashboardError, DashboardResult};
use crate::models::{MatchFilter, PlayerFilter, QueryParam, RowLimit, Specialty};
use sqlparser::ast::Ident;

/// Placeholder shown in the audit SQL returned to callers.
const DISPLAY_PLACEHOLDER: &str = "%s";
/// Placeholder understood by the MySQL driver.
const DRIVER_PLACEHOLDER: &str = "?";

/// Rows in the recent matches list.
pub const RECENT_MATCHES_LIMIT: u32 = 50;
/// Rows in the filtered player list.
pub const PLAYER_LIST_LIMIT: u32 = 100;
/// Rows in the top batsmen / bowlers lists.
pub const TOP_PLAYERS_LIMIT: u32 = 20;

/// A single SQL statement with its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text reported back to the caller
    pub sql: String,
    /// SQL text sent to the driver
    pub driver_sql: String,
    pub params: Vec<QueryParam>,
}

impl Statement {
    /// A statement with no bound values, sent to the driver as-is.
    pub fn raw(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        Self {
            driver_sql: sql.clone(),
            sql,
            params: Vec::new(),
        }
    }
}

/// Backtick-quote a MySQL identifier, doubling any embedded backticks.
pub fn quote_ident(name: &str) -> String {
    Ident::with_quote('`', name).to_string()
}

/// Trim a caller fragment and reject it when nothing is left.
fn required_fragment<'a>(fragment: &'a str, message: &str) -> DashboardResult<&'a str> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::validation(message));
    }
    Ok(trimmed)
}

/// Whether text is admitted by the read-only guard.
///
/// This is a prefix check only; chained statements after a leading SELECT are
/// not detected.
pub fn is_select(sql: &str) -> bool {
    sql.trim().to_lowercase().starts_with("select")
}

/// `SELECT * FROM `<table>` LIMIT <n>;`
pub fn fetch_table(table: &str, limit: RowLimit) -> Statement {
    Statement::raw(format!("SELECT * FROM {} LIMIT {};", quote_ident(table), limit))
}

/// The caller's read-only query, unchanged.
pub fn select(select_sql: &str) -> DashboardResult<Statement> {
    if !is_select(select_sql) {
        return Err(DashboardError::validation(
            "Only SELECT queries are allowed here.",
        ));
    }
    Ok(Statement::raw(select_sql))
}

/// `INSERT INTO `<table>` (`c1`, `c2`) VALUES (%s, %s);` with every value bound.
pub fn insert_row(table: &str, values: &[(String, QueryParam)]) -> DashboardResult<Statement> {
    if values.is_empty() {
        return Err(DashboardError::validation(
            "Insert requires at least one column value.",
        ));
    }
    if let Some((column, _)) = values.iter().find(|(c, _)| c.trim().is_empty()) {
        return Err(DashboardError::validation(format!(
            "Invalid column name '{}'.",
            column
        )));
    }

    let columns = values
        .iter()
        .map(|(column, _)| quote_ident(column))
        .collect::<Vec<_>>()
        .join(", ");
    let render = |placeholder: &str| {
        let placeholders = vec![placeholder; values.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({});",
            quote_ident(table),
            columns,
            placeholders
        )
    };

    Ok(Statement {
        sql: render(DISPLAY_PLACEHOLDER),
        driver_sql: render(DRIVER_PLACEHOLDER),
        params: values.iter().map(|(_, value)| value.clone()).collect(),
    })
}

/// `DELETE FROM `<table>` WHERE <where>;`
///
/// The WHERE fragment is inserted verbatim.
pub fn delete_rows(table: &str, where_clause: &str) -> DashboardResult<Statement> {
    let where_part = required_fragment(
        where_clause,
        "Refusing to delete without a WHERE clause.",
    )?;
    Ok(Statement::raw(format!(
        "DELETE FROM {} WHERE {};",
        quote_ident(table),
        where_part
    )))
}

/// `UPDATE `<table>` SET <set> WHERE <where>;`
///
/// Both fragments are inserted verbatim.
pub fn update_rows(table: &str, set_clause: &str, where_clause: &str) -> DashboardResult<Statement> {
    let set_part = required_fragment(set_clause, "SET clause cannot be empty.")?;
    let where_part = required_fragment(
        where_clause,
        "Refusing to update without a WHERE clause.",
    )?;
    Ok(Statement::raw(format!(
        "UPDATE {} SET {} WHERE {};",
        quote_ident(table),
        set_part,
        where_part
    )))
}

/// A condition with one `{}` slot for its placeholder, and the value bound there.
type Condition = (&'static str, QueryParam);

/// `<base> WHERE 1=1 [AND <condition>]... <tail>;` with every condition bound.
fn filtered_select(base: &str, conditions: Vec<Condition>, tail: &str) -> Statement {
    let render = |placeholder: &str| {
        let mut sql = format!("{} WHERE 1=1", base);
        for (condition, _) in &conditions {
            sql.push_str(" AND ");
            sql.push_str(&condition.replace("{}", placeholder));
        }
        format!("{} {};", sql, tail)
    };

    Statement {
        sql: render(DISPLAY_PLACEHOLDER),
        driver_sql: render(DRIVER_PLACEHOLDER),
        params: conditions.into_iter().map(|(_, value)| value).collect(),
    }
}

/// Non-null distinct values of one column, sorted. Feeds filter dropdowns.
pub fn distinct_values(table: &str, column: &str) -> Statement {
    let column = quote_ident(column);
    Statement::raw(format!(
        "SELECT DISTINCT {col} FROM {} WHERE {col} IS NOT NULL ORDER BY {col};",
        quote_ident(table),
        col = column
    ))
}

/// Latest matches from `recent_matches`, newest first.
pub fn recent_matches(filter: &MatchFilter) -> Statement {
    let mut conditions: Vec<Condition> = Vec::new();
    if let Some(format) = filter.match_format() {
        conditions.push(("match_format = {}", format.into()));
    }
    if let Some(state) = filter.state() {
        conditions.push(("state = {}", state.into()));
    }
    filtered_select(
        "SELECT match_id, match_desc, match_format, team1, team2, venue, start_date, state, status \
         FROM recent_matches",
        conditions,
        &format!("ORDER BY match_id DESC LIMIT {}", RECENT_MATCHES_LIMIT),
    )
}

/// Batting card of one match, by innings then runs.
pub fn batting_scorecard(match_id: i64) -> Statement {
    filtered_select(
        "SELECT player_name, runs, balls_faced, fours, sixes, strike_rate, innings_no \
         FROM batters_bat_data",
        vec![("match_id = {}", match_id.into())],
        "ORDER BY innings_no, runs DESC",
    )
}

/// Bowling card of one match, by innings then wickets.
pub fn bowling_scorecard(match_id: i64) -> Statement {
    filtered_select(
        "SELECT player_name, overs, runs, wickets, economy_rate, innings_no \
         FROM bowlers_bow_v_data",
        vec![("match_id = {}", match_id.into())],
        "ORDER BY innings_no, wickets DESC",
    )
}

/// Players matching a name substring, country and role, newest first.
pub fn players(filter: &PlayerFilter) -> Statement {
    let mut conditions: Vec<Condition> = Vec::new();
    if let Some(name) = filter.name() {
        conditions.push(("(name LIKE {})", format!("%{}%", name).into()));
    }
    if let Some(country) = filter.country() {
        conditions.push(("country = {}", country.into()));
    }
    if let Some(role) = filter.playing_role() {
        conditions.push(("playing_role = {}", role.into()));
    }
    filtered_select(
        "SELECT player_id, name, country, playing_role, batting_style, bowling_style FROM players",
        conditions,
        &format!("ORDER BY player_id DESC LIMIT {}", PLAYER_LIST_LIMIT),
    )
}

/// Most recently added players with a recorded style for the discipline.
pub fn top_players(specialty: Specialty) -> Statement {
    let style = specialty.style_column();
    Statement::raw(format!(
        "SELECT name, country, playing_role, {style} FROM players \
         WHERE {style} IS NOT NULL ORDER BY player_id DESC LIMIT {};",
        TOP_PLAYERS_LIMIT
    ))
}

//! Query-related data models.
//!
//! This module defines bound parameter values, the row limit and the results
//! returned by the query executors.

use crate::error::DashboardError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Default row limit for table previews.
pub const DEFAULT_ROW_LIMIT: u32 = 200;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QueryParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl QueryParam {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Convert an arbitrary JSON value. Arrays and objects are bound as their JSON text.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::String(n.to_string())),
            },
            JsonValue::String(s) => Self::String(s),
            other => Self::String(other.to_string()),
        }
    }
}

impl From<&str> for QueryParam {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for QueryParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Maximum number of rows a table preview returns.
///
/// Only ever holds a plain integer, so it renders into SQL verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowLimit(u32);

impl RowLimit {
    pub fn new(limit: u32) -> Self {
        Self(limit)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RowLimit {
    fn default() -> Self {
        Self(DEFAULT_ROW_LIMIT)
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowLimit {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(Self).map_err(|_| {
            DashboardError::validation(format!("Row limit must be a non-negative integer, got '{}'", s))
        })
    }
}

impl TryFrom<i64> for RowLimit {
    type Error = DashboardError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value).map(Self).map_err(|_| {
            DashboardError::validation(format!("Row limit out of range: {}", value))
        })
    }
}

/// Row limit as received from a caller: a number or numeric text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RowLimitInput {
    Int(i64),
    Text(String),
}

impl TryFrom<RowLimitInput> for RowLimit {
    type Error = DashboardError;

    fn try_from(input: RowLimitInput) -> Result<Self, Self::Error> {
        match input {
            RowLimitInput::Int(n) => RowLimit::try_from(n),
            RowLimitInput::Text(s) => s.parse(),
        }
    }
}

/// Rows returned by a read, with the SQL that produced them.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Map<String, JsonValue>>,
    pub sql: String,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of an INSERT/UPDATE/DELETE, with the SQL that was executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MutationResult {
    pub affected_rows: u64,
    pub sql: String,
}

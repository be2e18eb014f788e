//! Data models for the cricket dashboard.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod query;
pub mod schema;
pub mod stats;

pub use connection::{ConnectionParams, LOOPBACK_HOST};
pub use query::{
    DEFAULT_ROW_LIMIT, MutationResult, QueryParam, QueryResult, RowLimit, RowLimitInput,
};
pub use schema::{
    ColumnInfo, DatabaseStructure, Discovery, EXCLUDED_DATABASES, KeyRole, RoutineInfo,
    SchemaAccessFailure, SchemaInfo, ViewInfo, is_system_database,
};
pub use stats::{ANY_FILTER_VALUE, MatchFilter, PlayerFilter, Specialty, active_filter};

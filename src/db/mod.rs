//! Database access layer.
//!
//! This module provides:
//! - The connection factory and the `Connector`/`Session` seam
//! - Schema discovery
//! - Statement construction and the query executors
//! - MySQL row decoding

pub mod connector;
pub mod executor;
pub mod schema;
pub mod sql;
pub mod types;

pub use connector::{
    Connector, DEFAULT_CONNECT_TIMEOUT_SECS, MySqlConnector, MySqlSession, RowSet, Session,
    TableKind,
};
pub use executor::QueryExecutor;
pub use schema::SchemaInspector;
pub use sql::Statement;

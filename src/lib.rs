//! Cricket Dashboard library
//!
//! Backend for a cricket statistics dashboard: MySQL schema discovery,
//! read-only analytics queries, record management and a Cricbuzz sports
//! data client, exposed as MCP (Model Context Protocol) tools.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod sports;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{DashboardError, DashboardResult};
pub use mcp::DashboardService;

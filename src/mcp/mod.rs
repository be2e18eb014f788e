//! MCP server integration module.
//!
//! Wires the dashboard tool handlers into the rmcp framework.

pub mod service;

pub use service::DashboardService;

//! Error types for the cricket dashboard.
//!
//! This module defines all error types using `thiserror`. Validation failures
//! are raised before any statement reaches the database; connection and
//! statement failures are passed through to the caller for display.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// Only produced while enumerating a single database during discovery.
    #[error("Cannot read schema of database '{database}': {message}")]
    SchemaAccess { database: String, message: String },

    #[error("Database error: {message}")]
    Database {
        message: String,
        /// e.g., "42S02" for unknown table
        sql_state: Option<String>,
        suggestion: String,
    },

    #[error("Timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout {
        operation: String,
        elapsed_secs: u32,
    },

    #[error("Sports API unavailable ({endpoint}): {reason}")]
    ApiUnavailable { endpoint: String, reason: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DashboardError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a schema access error for one database.
    pub fn schema_access(database: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaAccess {
            database: database.into(),
            message: message.into(),
        }
    }

    /// Create a database error with optional SQL state.
    pub fn database(
        message: impl Into<String>,
        sql_state: Option<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Database {
            message: message.into(),
            sql_state,
            suggestion: suggestion.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, elapsed_secs: u32) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    pub fn api_unavailable(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ApiUnavailable {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Database { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Timeout { .. } | Self::ApiUnavailable { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Convert sqlx errors to DashboardError.
///
/// Statement errors keep the server's message and SQLSTATE untouched.
impl From<sqlx::Error> for DashboardError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => DashboardError::connection(
                msg.to_string(),
                "Check the host, port and credentials",
            ),
            sqlx::Error::Database(db_err) => {
                let code = db_err.code().map(|c| c.to_string());
                DashboardError::database(
                    db_err.message(),
                    code,
                    "Check the SQL syntax and referenced objects",
                )
            }
            sqlx::Error::RowNotFound => DashboardError::database(
                "No rows returned",
                None,
                "Verify the query conditions match existing data",
            ),
            sqlx::Error::Io(io_err) => DashboardError::connection(
                format!("I/O error: {}", io_err),
                "Check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => DashboardError::connection(
                format!("TLS error: {}", tls_err),
                "Verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => DashboardError::connection(
                format!("Protocol error: {}", msg),
                "Check database server compatibility",
            ),
            sqlx::Error::ColumnNotFound(col) => {
                DashboardError::internal(format!("Column not found in result: {}", col))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DashboardError::internal(
                format!("Column index {} out of bounds (len: {})", index, len),
            ),
            sqlx::Error::ColumnDecode { index, source } => {
                DashboardError::internal(format!("Failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                DashboardError::internal(format!("Decode error: {}", source))
            }
            sqlx::Error::WorkerCrashed => DashboardError::internal("Database worker crashed"),
            _ => DashboardError::internal(format!("Unknown database error: {}", err)),
        }
    }
}

/// Result type alias for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert DashboardError to MCP ErrorData.
impl From<DashboardError> for rmcp::ErrorData {
    fn from(err: DashboardError) -> Self {
        match &err {
            DashboardError::Validation { .. } => rmcp::ErrorData::invalid_params(
                err.to_string(),
                suggestion_data(Some("Correct the input and try again")),
            ),

            DashboardError::Database {
                message,
                sql_state,
                suggestion,
            } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", message, code),
                    None => message.clone(),
                };
                rmcp::ErrorData::invalid_params(msg, suggestion_data(Some(suggestion)))
            }

            DashboardError::Connection { suggestion, .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), suggestion_data(Some(suggestion)))
            }
            DashboardError::Timeout { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some("Check that the database server is responsive")),
            ),
            DashboardError::ApiUnavailable { .. } => rmcp::ErrorData::internal_error(
                err.to_string(),
                suggestion_data(Some("The sports data service is unavailable, try again later")),
            ),

            DashboardError::SchemaAccess { .. } | DashboardError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), None)
            }
        }
    }
}

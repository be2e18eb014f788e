//! Connection parameters.
//!
//! A `ConnectionParams` value is built for every call and discarded afterwards.

use tracing::warn;

/// Address substituted for the local-only host hints `""` and `"."`.
///
/// The MySQL driver reads a bare `.` as a named-pipe/socket request, which
/// fails for TCP connections.
pub const LOOPBACK_HOST: &str = "127.0.0.1";

/// Parameters for opening one database connection.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub user: String,
    /// Never logged
    password: String,
    /// None connects at server level (no default database)
    pub database: Option<String>,
    /// Raw port text as supplied by the caller; see [`ConnectionParams::resolved_port`].
    pub port: Option<String>,
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            database: None,
            port: None,
        }
    }

    /// Target a specific database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Same server and credentials, no default database.
    pub fn server_level(&self) -> Self {
        Self {
            database: None,
            ..self.clone()
        }
    }

    /// Set the port from caller-supplied text.
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Host to connect to, with `""` and `"."` normalized to the loopback address.
    pub fn resolved_host(&self) -> &str {
        match self.host.trim() {
            "" | "." => LOOPBACK_HOST,
            host => host,
        }
    }

    /// Port to connect to.
    ///
    /// A value that does not parse as a port number is ignored and the server
    /// default applies.
    pub fn resolved_port(&self) -> Option<u16> {
        let raw = self.port.as_deref().map(str::trim).filter(|p| !p.is_empty())?;
        match raw.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                warn!(port = %raw, "Ignoring non-numeric port, using server default");
                None
            }
        }
    }
}

impl std::fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"****")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

//! Cricket Dashboard - Main entry point.

use cricket_dashboard::config::{Config, TransportMode};
use cricket_dashboard::db::MySqlConnector;
use cricket_dashboard::sports::{SportsApiClient, SportsApiConfig};
use cricket_dashboard::tools::ToolContext;
use cricket_dashboard::transport::{HttpTransport, SharedState, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logs go to stderr; stdout carries the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();
    init_tracing(&config);

    info!(
        transport = %config.transport,
        "Starting Cricket Dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );

    let params = config.connection_params()?;
    let default_database = config.default_database()?;
    info!(
        host = %params.host,
        user = %params.user,
        database = %default_database,
        "Database settings loaded"
    );

    let connector = MySqlConnector::new(config.connect_timeout_duration());
    let context = Arc::new(ToolContext::new(
        connector,
        params,
        default_database,
        config.default_row_limit(),
    ));

    if config.rapidapi_key.is_none() {
        warn!("RAPIDAPI_KEY is not set; sports tools will report the API as unavailable");
    }
    let sports = Arc::new(SportsApiClient::new(SportsApiConfig {
        base_url: config.rapidapi_base_url(),
        api_host: config.rapidapi_host.clone(),
        api_key: config.rapidapi_key.clone(),
        timeout: config.api_timeout_duration(),
    })?);

    let state = SharedState::new(context, sports);
    let result = match config.transport {
        TransportMode::Stdio => StdioTransport::new(state).run().await,
        TransportMode::Http => {
            info!(
                addr = %config.http_bind_addr(),
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            HttpTransport::new(
                state,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

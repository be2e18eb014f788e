//! Stdio transport for the MCP server.

use crate::error::{DashboardError, DashboardResult};
use crate::transport::{SharedState, Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use tracing::{info, warn};

/// Reads JSON-RPC messages from stdin and writes responses to stdout.
pub struct StdioTransport {
    state: SharedState,
}

impl StdioTransport {
    pub fn new(state: SharedState) -> Self {
        Self { state }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DashboardResult<()> {
        info!("Starting MCP server with stdio transport");

        let running_service = self.state.service().serve(stdio()).await.map_err(|e| {
            DashboardError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        let shutdown_requested = tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => info!("Stdio transport completed normally"),
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(DashboardError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
                false
            }
            _ = wait_for_signal() => {
                info!("Shutdown signal received");
                true
            }
        };

        if shutdown_requested {
            // tokio::select! cannot interrupt a blocking stdin read
            info!("Exiting process");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

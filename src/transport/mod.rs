//! Transport layer for the MCP server.
//!
//! - Stdio: standard input/output for CLI integration
//! - HTTP: Streamable HTTP for web clients

pub mod http;
pub mod stdio;

pub use http::HttpTransport;
pub use stdio::StdioTransport;

use crate::db::MySqlConnector;
use crate::error::DashboardResult;
use crate::mcp::DashboardService;
use crate::sports::SportsApiClient;
use crate::tools::ToolContext;
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

/// Trait for MCP transport implementations.
pub trait Transport: Send + Sync {
    /// Serve requests until the transport is shut down.
    fn run(&self) -> impl Future<Output = DashboardResult<()>> + Send;

    /// Name of this transport, for logging.
    fn name(&self) -> &'static str;
}

/// State every transport hands to the services it creates.
#[derive(Clone)]
pub struct SharedState {
    pub context: Arc<ToolContext<MySqlConnector>>,
    pub sports: Arc<SportsApiClient>,
}

impl SharedState {
    pub fn new(context: Arc<ToolContext<MySqlConnector>>, sports: Arc<SportsApiClient>) -> Self {
        Self { context, sports }
    }

    pub fn service(&self) -> DashboardService {
        DashboardService::new(self.context.clone(), self.sports.clone())
    }
}

/// Wait for SIGINT or SIGTERM.
///
/// A handler that cannot be installed never fires.
pub(crate) async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

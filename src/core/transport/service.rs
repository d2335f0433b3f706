//! Transport service - starts the configured transport.

use tracing::info;

use super::http::HttpTransport;
use super::stdio::StdioTransport;
use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

/// Transport service - manages the transport layer for the server.
pub struct TransportService {
    config: TransportConfig,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Start the transport with the given MCP server.
    ///
    /// Returns once the transport has shut down.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            TransportConfig::Stdio => StdioTransport::run(server).await,
            TransportConfig::Http(cfg) => HttpTransport::new(cfg).run(server).await,
        }
    }
}

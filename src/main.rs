//! Budget Server Entry Point
//!
//! Initializes logging, loads configuration, opens storage and starts the
//! server with the configured transport. The connection pool is closed
//! once the transport returns.

use anyhow::Result;
use std::sync::Arc;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use budget_mcp_server::core::{Config, McpServer, TransportService};
use budget_mcp_server::domains::expenses::ExpenseRepository;
use budget_mcp_server::storage::Database;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    init_logging(&config.logging.level, config.logging.with_timestamps);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let database = Database::connect(&config.database).await?;
    info!("Storage ready: {}", database.backend());

    let repository = Arc::new(
        ExpenseRepository::new(database.clone())
            .with_default_currency(config.expenses.default_currency.clone()),
    );

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, repository);

    info!("Server initialized");

    let outcome = transport.run(server).await;
    if let Err(e) = &outcome {
        error!("Transport failed: {}", e);
    }

    database.close().await;
    info!("Server shutting down");

    outcome.map_err(Into::into)
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr so stdout stays free for the STDIO transport.
fn init_logging(level: &str, with_timestamps: bool) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}

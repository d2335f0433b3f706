//! Budget Tracker Library
//!
//! A small expense tracking service. Expenses are recorded, listed, fetched,
//! deleted and summarised per month, over REST and as MCP tools.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **expenses**: records, validation, repository and REST routes
//!   - **tools**: MCP tools that wrap the expense operations
//! - **storage**: the SQLite / PostgreSQL connection pool and statements
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use budget_mcp_server::{
//!     Config, McpServer, domains::expenses::ExpenseRepository, storage::Database,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let database = Database::connect(&config.database).await?;
//!     let repository = Arc::new(ExpenseRepository::new(database));
//!     let server = McpServer::new(config, repository);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod storage;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};

//! Transport layer for the budget server.
//!
//! This module provides two transport implementations:
//! - **HTTP** (default): REST expense routes plus JSON-RPC over POST
//! - **STDIO**: Standard input/output for locally spawned MCP clients
//!
//! Each transport handles the connection lifecycle and delegates
//! message processing to the MCP server handler.

mod config;
mod error;
mod service;

pub mod http;
pub mod stdio;

pub use config::{HttpConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

//! MCP Server implementation and lifecycle management.
//!
//! This module contains the server handler that implements the MCP protocol
//! on top of the expense repository.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//! - `create_route()` (used by the rmcp ToolRouter for STDIO transport)
//!
//! The ToolRouter is built in `domains/tools/router.rs`.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::expenses::ExpenseRepository;
use crate::domains::tools::{ToolError, ToolRegistry, build_tool_router};

const INSTRUCTIONS: &str = "Budget tracker. Use add_expense to record spending, list_expenses and get_expense_by_id to look it up, delete_expense to remove a record and get_monthly_summary for per-category monthly totals. Dates are YYYY-MM-DD.";

/// The main MCP server handler.
///
/// Both transports share one repository: REST routes, JSON-RPC tool calls
/// and the rmcp router all go through the same connection pool.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Expense storage shared by every surface.
    repository: Arc<ExpenseRepository>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server over the given repository.
    pub fn new(config: Config, repository: Arc<ExpenseRepository>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(repository.clone()),
            config: Arc::new(config),
            repository,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared expense repository.
    pub fn repository(&self) -> &Arc<ExpenseRepository> {
        &self.repository
    }

    /// Usage hint returned to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema,
                    "outputSchema": t.output_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.repository.clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

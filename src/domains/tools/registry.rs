//! Tool Registry - central registration and dispatch for the expense tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls made through the JSON-RPC endpoint
//! - Tool metadata for listing

use std::sync::Arc;
use tracing::warn;

use rmcp::model::Tool;

use super::ToolError;
use super::definitions::{
    AddExpenseTool, DeleteExpenseTool, GetExpenseTool, ListExpensesTool, MonthlySummaryTool,
};
use crate::domains::expenses::ExpenseRepository;

/// Tool registry - manages all available tools.
#[derive(Clone)]
pub struct ToolRegistry {
    repository: Arc<ExpenseRepository>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(repository: Arc<ExpenseRepository>) -> Self {
        Self { repository }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            AddExpenseTool::NAME,
            ListExpensesTool::NAME,
            GetExpenseTool::NAME,
            DeleteExpenseTool::NAME,
            MonthlySummaryTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            AddExpenseTool::to_tool(),
            ListExpensesTool::to_tool(),
            GetExpenseTool::to_tool(),
            DeleteExpenseTool::to_tool(),
            MonthlySummaryTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let repository = self.repository.clone();
        match name {
            AddExpenseTool::NAME => AddExpenseTool::http_handler(arguments, repository).await,
            ListExpensesTool::NAME => ListExpensesTool::http_handler(arguments, repository).await,
            GetExpenseTool::NAME => GetExpenseTool::http_handler(arguments, repository).await,
            DeleteExpenseTool::NAME => DeleteExpenseTool::http_handler(arguments, repository).await,
            MonthlySummaryTool::NAME => {
                MonthlySummaryTool::http_handler(arguments, repository).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

//! Helpers shared by the expense tools.

use rmcp::model::{CallToolResult, Content};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::domains::expenses::ExpenseError;
use crate::domains::tools::ToolError;

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Report a failed expense operation to the agent.
pub fn expense_error_result(error: &ExpenseError) -> CallToolResult {
    error_result(&error.to_string())
}

/// A text summary for humans plus the record as structured content.
pub fn structured_result<T: Serialize>(summary: String, value: &T) -> CallToolResult {
    match serde_json::to_value(value) {
        Ok(structured) => CallToolResult {
            content: vec![Content::text(summary)],
            structured_content: Some(structured),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(&format!("Failed to serialize result: {}", e)),
    }
}

/// Decode JSON-RPC arguments into a tool's parameter type.
pub fn parse_arguments<T: DeserializeOwned>(arguments: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Serialize a tool result for the HTTP transport.
pub fn to_json(result: &CallToolResult) -> Result<serde_json::Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::execution_failed(e.to_string()))
}

#[cfg(test)]
pub(crate) fn result_text(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        rmcp::model::RawContent::Text(text) => &text.text,
        _ => panic!("Expected text content"),
    }
}

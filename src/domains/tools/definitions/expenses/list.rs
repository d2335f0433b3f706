//! List-expenses tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{expense_error_result, parse_arguments, structured_result, to_json};
use crate::domains::expenses::{ExpenseList, ExpenseQuery, ExpenseRepository};
use crate::domains::tools::ToolError;

/// List-expenses tool - filtered, paginated listing.
pub struct ListExpensesTool;

impl ListExpensesTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "list_expenses";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "List expenses, newest first. Optional filters: start_date and end_date (YYYY-MM-DD, inclusive), exact category, limit (1-1000, default 200) and offset.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(params: &ExpenseQuery, repository: &ExpenseRepository) -> CallToolResult {
        info!("List expenses tool called");

        match repository.list(params).await {
            Ok(expenses) => {
                let list = ExpenseList::from(expenses);
                let summary = match list.count {
                    0 => "No expenses match the filters".to_string(),
                    1 => "Found 1 expense".to_string(),
                    n => format!("Found {} expenses", n),
                };
                structured_result(summary, &list)
            }
            Err(e) => expense_error_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    pub async fn http_handler(
        arguments: serde_json::Value,
        repository: Arc<ExpenseRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: ExpenseQuery = match arguments {
            serde_json::Value::Null => ExpenseQuery::default(),
            other => parse_arguments(other)?,
        };
        let result = Self::execute(&params, &repository).await;
        to_json(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ExpenseQuery>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<ExpenseList>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp server handler.
    pub fn create_route<S>(repository: Arc<ExpenseRepository>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let repository = repository.clone();
            async move {
                let params: ExpenseQuery = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &repository).await)
            }
            .boxed()
        })
    }
}

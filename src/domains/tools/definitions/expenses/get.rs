//! Get-expense tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{expense_error_result, parse_arguments, structured_result, to_json};
use crate::domains::expenses::{Expense, ExpenseIdParams, ExpenseRepository};
use crate::domains::tools::ToolError;

/// Get-expense tool - fetches one expense by id.
pub struct GetExpenseTool;

impl GetExpenseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_expense_by_id";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetch a single expense by its id.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(expense_id = params.expense_id))]
    pub async fn execute(
        params: &ExpenseIdParams,
        repository: &ExpenseRepository,
    ) -> CallToolResult {
        info!("Get expense tool called");

        match repository.get(params.expense_id).await {
            Ok(expense) => {
                let summary = format!(
                    "Expense #{}: {} for {} on {}",
                    expense.id, expense.amount, expense.category, expense.expense_date
                );
                structured_result(summary, &expense)
            }
            Err(e) => expense_error_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    pub async fn http_handler(
        arguments: serde_json::Value,
        repository: Arc<ExpenseRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: ExpenseIdParams = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await;
        to_json(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<ExpenseIdParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<Expense>().into()),
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
                let params: ExpenseIdParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &repository).await)
            }
            .boxed()
        })
    }
}

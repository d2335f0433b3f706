//! Delete-expense tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{expense_error_result, parse_arguments, structured_result, to_json};
use crate::domains::expenses::{DeleteResult, ExpenseIdParams, ExpenseRepository};
use crate::domains::tools::ToolError;

/// Delete-expense tool - removes one expense by id.
pub struct DeleteExpenseTool;

impl DeleteExpenseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "delete_expense";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Delete an expense by its id. Deleting an id that does not exist reports not found.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(expense_id = params.expense_id))]
    pub async fn execute(
        params: &ExpenseIdParams,
        repository: &ExpenseRepository,
    ) -> CallToolResult {
        info!("Delete expense tool called");

        match repository.delete(params.expense_id).await {
            Ok(deleted) => {
                let summary = format!("Deleted expense #{}", deleted.deleted_id);
                structured_result(summary, &deleted)
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
            output_schema: Some(schema_for_type::<DeleteResult>().into()),
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

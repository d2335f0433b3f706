//! Add-expense tool definition.
//!
//! Records a new expense, the tool form of `POST /expenses`.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{expense_error_result, parse_arguments, structured_result, to_json};
use crate::domains::expenses::{Expense, ExpenseRepository, NewExpense};
use crate::domains::tools::ToolError;

/// Add-expense tool - records one expense.
pub struct AddExpenseTool;

impl AddExpenseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "add_expense";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Record a new expense. Amount must be greater than 0 and expense_date must be YYYY-MM-DD. Returns the stored expense with its id.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(category = %params.category))]
    pub async fn execute(params: &NewExpense, repository: &ExpenseRepository) -> CallToolResult {
        info!("Add expense tool called");

        match repository.create(params).await {
            Ok(expense) => {
                let summary = format!(
                    "Recorded expense #{}: {} for {} on {}",
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
        let params: NewExpense = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await;
        to_json(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<NewExpense>().into(),
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
                let params: NewExpense = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &repository).await)
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::common::result_text;
    use super::*;
    use crate::domains::expenses::test_repository;

    fn params(amount: f64) -> NewExpense {
        NewExpense {
            amount,
            category: "food".to_string(),
            description: Some("dinner".to_string()),
            expense_date: "2025-12-23".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_returns_structured_expense() {
        let (_dir, repository) = test_repository().await;

        let result = AddExpenseTool::execute(&params(75000.0), &repository).await;
        assert_eq!(result.is_error, Some(false));

        let structured = result.structured_content.clone().unwrap();
        assert_eq!(structured["category"], "food");
        assert_eq!(structured["description"], "dinner");
        assert!(result_text(&result).contains("Recorded expense"));

        let id = structured["id"].as_i64().unwrap();
        assert!(repository.get(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_add_validation_error_is_tool_error() {
        let (_dir, repository) = test_repository().await;

        let result = AddExpenseTool::execute(&params(-1.0), &repository).await;
        assert!(result.is_error.unwrap_or(false));
        assert!(result_text(&result).contains("amount must be greater than 0"));
    }

    #[tokio::test]
    async fn test_http_handler_missing_param() {
        let (_dir, repository) = test_repository().await;

        let result = AddExpenseTool::http_handler(
            serde_json::json!({ "amount": 5, "expense_date": "2025-12-23" }),
            Arc::new(repository),
        )
        .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_http_handler_serializes_structured_content() {
        let (_dir, repository) = test_repository().await;

        let value = AddExpenseTool::http_handler(
            serde_json::json!({ "amount": 5, "category": "snacks", "expense_date": "2025-12-23" }),
            Arc::new(repository),
        )
        .await
        .unwrap();

        assert_eq!(value["structuredContent"]["category"], "snacks");
        let text = value["content"][0]["text"].as_str().unwrap();
        assert!(!text.starts_with('{'), "Text should be summary, not JSON");
    }

    #[test]
    fn test_tool_metadata() {
        let tool = AddExpenseTool::to_tool();
        assert_eq!(tool.name, "add_expense");
        assert!(tool.input_schema.contains_key("properties"));
        assert!(tool.output_schema.is_some());
    }
}

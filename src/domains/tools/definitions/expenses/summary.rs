//! Monthly-summary tool definition.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{expense_error_result, parse_arguments, structured_result, to_json};
use crate::domains::expenses::{ExpenseRepository, MonthlySummary, SummaryQuery};
use crate::domains::tools::ToolError;

/// Monthly-summary tool - spending per category for one month.
pub struct MonthlySummaryTool;

impl MonthlySummaryTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_monthly_summary";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Total spending for a calendar month (year 2000-2100, month 1-12), grouped by category, with the grand total. Optional currency code (default IDR).";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(year = params.year, month = params.month))]
    pub async fn execute(params: &SummaryQuery, repository: &ExpenseRepository) -> CallToolResult {
        info!("Monthly summary tool called");

        match repository.monthly_summary(params).await {
            Ok(summary) => {
                let text = format!(
                    "{}-{:02}: {} {} across {} categories",
                    summary.year,
                    summary.month,
                    summary.total,
                    summary.currency,
                    summary.by_category.len()
                );
                structured_result(text, &summary)
            }
            Err(e) => expense_error_result(&e),
        }
    }

    /// HTTP handler for this tool (for HTTP transport).
    pub async fn http_handler(
        arguments: serde_json::Value,
        repository: Arc<ExpenseRepository>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: SummaryQuery = parse_arguments(arguments)?;
        let result = Self::execute(&params, &repository).await;
        to_json(&result)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<SummaryQuery>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<MonthlySummary>().into()),
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
                let params: SummaryQuery = serde_json::from_value(serde_json::Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &repository).await)
            }
            .boxed()
        })
    }
}

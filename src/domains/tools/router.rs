//! Tool Router - builds the rmcp ToolRouter for the STDIO transport.
//!
//! Each tool definition knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    AddExpenseTool, DeleteExpenseTool, GetExpenseTool, ListExpensesTool, MonthlySummaryTool,
};
use crate::domains::expenses::ExpenseRepository;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(repository: Arc<ExpenseRepository>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(AddExpenseTool::create_route(repository.clone()))
        .with_route(ListExpensesTool::create_route(repository.clone()))
        .with_route(GetExpenseTool::create_route(repository.clone()))
        .with_route(DeleteExpenseTool::create_route(repository.clone()))
        .with_route(MonthlySummaryTool::create_route(repository))
}

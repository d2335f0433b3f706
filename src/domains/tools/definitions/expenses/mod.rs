mod add;
mod common;
mod delete;
mod get;
mod list;
mod summary;

pub use add::AddExpenseTool;
pub use delete::DeleteExpenseTool;
pub use get::GetExpenseTool;
pub use list::ListExpensesTool;
pub use summary::MonthlySummaryTool;

//! Expenses domain module.
//!
//! - `model.rs` - records, request shapes, validation
//! - `repository.rs` - typed operations over the storage adapter
//! - `routes.rs` - the REST surface
//! - `error.rs` - validation / not-found / storage errors

mod error;
mod model;
mod repository;
pub mod routes;

pub use error::{ExpenseError, ExpenseResult};
pub use model::{
    CategoryTotal, DEFAULT_LIMIT, DeleteResult, Expense, ExpenseFilter, ExpenseIdParams,
    ExpenseList, ExpenseQuery, MAX_LIMIT, MonthlySummary, NewExpense, SummaryPeriod, SummaryQuery,
    ValidExpense,
};
pub use repository::ExpenseRepository;

/// A repository over a fresh SQLite file. Keep the `TempDir` alive.
#[cfg(test)]
pub(crate) async fn test_repository() -> (tempfile::TempDir, ExpenseRepository) {
    use crate::core::config::DatabaseConfig;
    use crate::storage::Database;

    let dir = tempfile::TempDir::new().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.path().join("expenses.db").display()),
        max_connections: 1,
    };
    let database = Database::connect(&config).await.unwrap();
    (dir, ExpenseRepository::new(database))
}

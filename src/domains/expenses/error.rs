//! Expense-specific error types.

use axum::http::StatusCode;
use thiserror::Error;

/// Result type for expense operations.
pub type ExpenseResult<T> = Result<T, ExpenseError>;

/// Errors that can occur during expense operations.
#[derive(Debug, Error)]
pub enum ExpenseError {
    /// Bad or missing input. Raised before any storage call.
    #[error("{0}")]
    Validation(String),

    /// No expense with this id.
    #[error("Expense {0} not found")]
    NotFound(i64),

    /// Connectivity or driver failure.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ExpenseError {
    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status for this error class.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

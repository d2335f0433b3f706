//! Error types for process startup and configuration.
//!
//! Request-level failures live next to the code that raises them
//! (`ExpenseError`, `ToolError`, `TransportError`); this type covers what can
//! go wrong before the server is able to take requests.

use thiserror::Error;

/// A specialized Result type for startup operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring the server or opening storage.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure opening or bootstrapping the database.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

//! Storage backend detection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{Error, Result};

const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount REAL NOT NULL CHECK (amount > 0),
        category TEXT NOT NULL,
        description TEXT,
        expense_date TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_expenses_expense_date ON expenses (expense_date)",
];

// Dates are kept as ISO-8601 text on both backends: the Any driver binds
// strings as TEXT, and Postgres refuses to compare DATE columns with TEXT.
const POSTGRES_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS expenses (
        id BIGSERIAL PRIMARY KEY,
        amount DOUBLE PRECISION NOT NULL CHECK (amount > 0),
        category TEXT NOT NULL,
        description TEXT,
        expense_date TEXT NOT NULL,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_expenses_expense_date ON expenses (expense_date)",
];

/// The relational store behind a connection URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Embedded, file-based store.
    Sqlite,

    /// Networked PostgreSQL server.
    Postgres,
}

impl Backend {
    /// Detect the backend from a connection URL.
    ///
    /// `sqlite:` URLs and bare filesystem paths select SQLite,
    /// `postgres://` and `postgresql://` select PostgreSQL. Any other
    /// scheme is a configuration error.
    pub fn detect(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::config("database URL is empty"));
        }

        if url.starts_with("sqlite:") {
            return Ok(Self::Sqlite);
        }

        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Ok(Self::Postgres);
        }

        match url.split_once("://") {
            Some((scheme, _)) => Err(Error::config(format!(
                "unsupported database scheme '{}' (expected sqlite or postgres)",
                scheme
            ))),
            None => Ok(Self::Sqlite),
        }
    }

    /// Turn a configured URL into one sqlx can open.
    ///
    /// Bare paths become `sqlite://<path>?mode=rwc` so the file is created
    /// on first use.
    pub fn connection_url(self, url: &str) -> String {
        let url = url.trim();
        match self {
            Self::Sqlite if !url.starts_with("sqlite:") => format!("sqlite://{}?mode=rwc", url),
            _ => url.to_string(),
        }
    }

    /// Short lowercase name, as reported by the health endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
        }
    }

    /// DDL run once at startup.
    pub(crate) fn schema(self) -> &'static [&'static str] {
        match self {
            Self::Sqlite => SQLITE_SCHEMA,
            Self::Postgres => POSTGRES_SCHEMA,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Configuration management for the budget server.
//!
//! Configuration is built from defaults, then overridden by environment
//! variables (a `.env` file is loaded first when present).

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Connection string used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://budget.db?mode=rwc";

/// Currency reported by monthly summaries when the caller gives none.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// Main configuration structure for the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Storage backend selection.
    pub database: DatabaseConfig,

    /// Expense domain settings.
    pub expenses: ExpensesConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Storage configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://...`, `postgres://...`, or a bare SQLite file path.
    pub url: String,

    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

/// Expense domain settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpensesConfig {
    /// Currency code echoed by monthly summaries by default.
    pub default_currency: String,
}

impl DatabaseConfig {
    /// The connection URL with any password replaced, safe to log.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };

        let (authority, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };

        let Some((userinfo, host)) = authority.rsplit_once('@') else {
            return self.url.clone();
        };

        match userinfo.split_once(':') {
            Some((user, _)) => format!("{}://{}:[REDACTED]@{}{}", scheme, user, host, path),
            None => self.url.clone(),
        }
    }
}

/// Custom Debug implementation to keep database passwords out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
        }
    }
}

impl Default for ExpensesConfig {
    fn default() -> Self {
        Self {
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "Budget Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            database: DatabaseConfig::default(),
            expenses: ExpensesConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` selects storage; everything else is prefixed with
    /// `BUDGET_`, e.g. `BUDGET_LOG_LEVEL`, `BUDGET_TRANSPORT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("BUDGET_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("BUDGET_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("BUDGET_LOG_TIMESTAMPS") {
            config.logging.with_timestamps =
                timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                config.database.url = url;
            }
        }

        if let Some(max) = std::env::var("BUDGET_DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
        {
            config.database.max_connections = max;
        }

        if let Ok(currency) = std::env::var("BUDGET_DEFAULT_CURRENCY") {
            let currency = currency.trim().to_uppercase();
            if !currency.is_empty() {
                config.expenses.default_currency = currency;
            }
        }

        config.transport = TransportConfig::from_env();

        config
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

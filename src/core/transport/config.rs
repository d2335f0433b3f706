//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport.
    Stdio,

    /// HTTP transport: REST routes and JSON-RPC over POST.
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable permissive CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_path() -> String {
    "/mcp".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::Http(HttpConfig::default())
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl HttpConfig {
    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an HTTP transport config.
    pub fn http(port: u16, host: impl Into<String>) -> Self {
        Self::Http(HttpConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    ///
    /// `BUDGET_HTTP_PORT` wins over the platform-provided `PORT`.
    pub fn from_env() -> Self {
        let transport = std::env::var("BUDGET_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            "stdio" => Self::Stdio,
            _ => {
                let port = ["BUDGET_HTTP_PORT", "PORT"]
                    .iter()
                    .find_map(|key| std::env::var(key).ok().and_then(|p| p.parse().ok()))
                    .unwrap_or_else(default_port);
                let host = std::env::var("BUDGET_HTTP_HOST").unwrap_or_else(|_| default_host());
                let mut rpc_path =
                    std::env::var("BUDGET_MCP_PATH").unwrap_or_else(|_| default_rpc_path());
                if !rpc_path.starts_with('/') {
                    rpc_path.insert(0, '/');
                }
                let enable_cors = std::env::var("BUDGET_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true);
                Self::Http(HttpConfig {
                    port,
                    host,
                    rpc_path,
                    enable_cors,
                })
            }
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            Self::Http(cfg) => format!(
                "HTTP on {}:{} (MCP at {})",
                cfg.host, cfg.port, cfg.rpc_path
            ),
        }
    }

    /// Check if this transport is the STDIO mode.
    pub fn is_stdio(&self) -> bool {
        matches!(self, Self::Stdio)
    }
}

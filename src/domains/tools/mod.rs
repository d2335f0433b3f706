//! Tools domain module.
//!
//! Publishes the expense operations as MCP tools that agents can call.
//!
//! ## Architecture
//!
//! - `definitions/` - one file per tool: parameters, `execute()`,
//!   `http_handler()`, metadata and route
//! - `router.rs` - rmcp ToolRouter used by the `ServerHandler` (stdio)
//! - `registry.rs` - name-based dispatch for JSON-RPC over HTTP
//! - `error.rs` - Tool-specific error types
//!
//! Tool parameters are the same request types the REST routes accept, so
//! the published schemas follow the REST surface.

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;

//! Domains module containing business logic organized by bounded contexts.
//!
//! - **expenses**: expense records, validation, repository and REST routes
//! - **tools**: the expense operations published as MCP tools

pub mod expenses;
pub mod tools;

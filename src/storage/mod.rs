//! Storage adapter.
//!
//! A single pooled connection to either an embedded SQLite file or a
//! networked PostgreSQL server, both driven through sqlx's `Any` driver so
//! the repository layer writes its SQL once.
//!
//! - `backend.rs` - backend detection from the connection URL and the
//!   per-backend schema bootstrap
//! - `statement.rs` - parameterized statements with `$n` placeholders
//! - `database.rs` - the pool handle and its execute/query primitives

mod backend;
mod database;
mod statement;

pub use backend::Backend;
pub use database::Database;
pub use statement::{Bind, Statement};

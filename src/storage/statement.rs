//! Parameterized SQL statements.
//!
//! Values never reach the SQL text: every `push_bind` appends a numbered
//! `$n` placeholder, which both SQLite and PostgreSQL accept, and records
//! the value to bind at execution time.

use sqlx::{Any, any::AnyArguments, query::Query};
use std::fmt::Write;

/// A value bound to a statement placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Int(i64),
    Float(f64),
    Text(String),
    NullableText(Option<String>),
}

impl From<i64> for Bind {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Bind {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Bind {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Bind {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<String>> for Bind {
    fn from(value: Option<String>) -> Self {
        Self::NullableText(value)
    }
}

/// SQL text plus its ordered bind values.
#[derive(Debug, Clone, Default)]
pub struct Statement {
    sql: String,
    binds: Vec<Bind>,
}

impl Statement {
    /// Start a statement with the given SQL prefix.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Append raw SQL. Only ever pass literals here.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Append the next placeholder and remember its value.
    pub fn push_bind(&mut self, value: impl Into<Bind>) -> &mut Self {
        self.binds.push(value.into());
        // Writing to a String cannot fail.
        let _ = write!(self.sql, "${}", self.binds.len());
        self
    }

    /// The SQL text with placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The values in placeholder order.
    pub fn binds(&self) -> &[Bind] {
        &self.binds
    }

    /// Build the sqlx query with all values bound.
    pub(crate) fn query(&self) -> Query<'_, Any, AnyArguments<'_>> {
        let mut query = sqlx::query(&self.sql);
        for bind in &self.binds {
            query = match bind {
                Bind::Int(value) => query.bind(*value),
                Bind::Float(value) => query.bind(*value),
                Bind::Text(value) => query.bind(value.clone()),
                Bind::NullableText(value) => query.bind(value.clone()),
            };
        }
        query
    }
}

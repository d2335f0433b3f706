//! Database handle.
//!
//! Constructed once in `main`, shared by cloning (the pool is reference
//! counted), and closed after the transport returns.

use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::AnyPool;
use tracing::{debug, info, instrument};

use super::{Backend, Statement};
use crate::core::config::DatabaseConfig;
use crate::core::error::Result;

/// Pooled connection to the expense store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    backend: Backend,
}

impl Database {
    /// Open the pool and make sure the `expenses` table exists.
    #[instrument(skip_all, fields(url = %config.redacted_url()))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let backend = Backend::detect(&config.url)?;
        let url = backend.connection_url(&config.url);

        sqlx::any::install_default_drivers();

        info!(
            "Connecting to {} storage (max {} connections)",
            backend, config.max_connections
        );

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await?;

        let database = Self { pool, backend };
        database.bootstrap().await?;

        Ok(database)
    }

    /// Create the table and index if absent.
    pub async fn bootstrap(&self) -> sqlx::Result<()> {
        for ddl in self.backend.schema() {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        debug!("Schema bootstrap complete for {}", self.backend);
        Ok(())
    }

    /// Which backend this handle talks to.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Run a statement and return the number of affected rows.
    pub async fn execute(&self, statement: &Statement) -> sqlx::Result<u64> {
        debug!(sql = statement.sql(), "execute");
        let result = statement.query().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Run a statement expected to return exactly one row.
    pub async fn fetch_one(&self, statement: &Statement) -> sqlx::Result<AnyRow> {
        debug!(sql = statement.sql(), "fetch_one");
        statement.query().fetch_one(&self.pool).await
    }

    /// Run a statement returning zero or one row.
    pub async fn fetch_optional(&self, statement: &Statement) -> sqlx::Result<Option<AnyRow>> {
        debug!(sql = statement.sql(), "fetch_optional");
        statement.query().fetch_optional(&self.pool).await
    }

    /// Run a statement returning any number of rows.
    pub async fn fetch_all(&self, statement: &Statement) -> sqlx::Result<Vec<AnyRow>> {
        debug!(sql = statement.sql(), "fetch_all");
        statement.query().fetch_all(&self.pool).await
    }

    /// Close every pooled connection. Further queries fail.
    pub async fn close(&self) {
        info!("Closing {} storage", self.backend);
        self.pool.close().await;
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

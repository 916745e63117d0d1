//! PostgreSQL storage backend for the revocation registry.
//!
//! Provides persistent storage for:
//!
//! - Revocation rows (`revocation` table), partitioned by 8-hour bucket
//! - Authorization rules (`authorization_rule` table)
//!
//! # Example
//!
//! ```ignore
//! use revocation_postgres::{PostgresConfig, PostgresRevocationStorage};
//!
//! let storage = PostgresRevocationStorage::connect(&PostgresConfig::new(url)).await?;
//! storage.ensure_schema().await?;
//!
//! let store = BucketedRevocationStore::new(storage.revocations(), max_time_delta);
//! let rules = storage.rules();
//! ```

pub mod config;
pub mod error;
pub mod pool;
pub mod revocation;
pub mod rules;
pub mod schema;

use std::sync::Arc;

pub use config::PostgresConfig;
pub use error::{PostgresError, Result};
pub use revocation::PostgresRevocationBackend;
pub use rules::PostgresAuthorizationRulesStore;
pub use sqlx_postgres::PgPool;

// =============================================================================
// PostgreSQL Revocation Storage
// =============================================================================

/// Holds the process-wide connection pool and hands out backends sharing it.
#[derive(Debug, Clone)]
pub struct PostgresRevocationStorage {
    pool: Arc<PgPool>,
}

impl PostgresRevocationStorage {
    /// Create new storage with an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create new storage by connecting to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub async fn connect(config: &PostgresConfig) -> Result<Self> {
        let pool = pool::create_pool(config).await?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Creates the tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the revocation row backend.
    #[must_use]
    pub fn revocations(&self) -> PostgresRevocationBackend {
        PostgresRevocationBackend::new(Arc::clone(&self.pool))
    }

    /// Get the authorization rules store.
    #[must_use]
    pub fn rules(&self) -> PostgresAuthorizationRulesStore {
        PostgresAuthorizationRulesStore::new(Arc::clone(&self.pool))
    }
}

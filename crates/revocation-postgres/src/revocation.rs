//! Revocation rows in PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use revocation_core::{Bucket, EpochMillis};
use revocation_storage::{RevocationBackend, RevocationRow, StorageError};
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::PgPool;

use crate::error::{PostgresError, Result};

/// Selected columns of one `revocation` row.
type RowTuple = (String, i16, String, String, String, i64);

const UPSERT_REVOCATION: &str = r#"
    INSERT INTO revocation
        (bucket_date, bucket_interval, revocation_type, revocation_data, revoked_by, revoked_at)
    VALUES ($1, $2, $3, $4, $5, $6)
    ON CONFLICT (bucket_date, bucket_interval, revoked_at, revoked_by)
    DO UPDATE SET
        revocation_type = EXCLUDED.revocation_type,
        revocation_data = EXCLUDED.revocation_data
"#;

const SELECT_BUCKET: &str = r#"
    SELECT bucket_date, bucket_interval, revocation_type, revocation_data, revoked_by, revoked_at
    FROM revocation
    WHERE bucket_date = $1
      AND bucket_interval = $2
      AND revoked_at > $3
"#;

/// [`RevocationBackend`] over the `revocation` table.
#[derive(Debug, Clone)]
pub struct PostgresRevocationBackend {
    pool: Arc<PgPool>,
}

impl PostgresRevocationBackend {
    /// Create a new backend with a connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn insert(&self, row: &RevocationRow) -> Result<()> {
        query(UPSERT_REVOCATION)
            .bind(&row.bucket_date)
            .bind(i16::from(row.bucket_interval))
            .bind(&row.revocation_type)
            .bind(&row.revocation_data)
            .bind(&row.revoked_by)
            .bind(row.revoked_at)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn select(&self, bucket: &Bucket, after: EpochMillis) -> Result<Vec<RevocationRow>> {
        let rows: Vec<RowTuple> = query_as(SELECT_BUCKET)
            .bind(&bucket.date)
            .bind(i16::from(bucket.interval))
            .bind(after)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(row_from_tuple).collect()
    }
}

fn row_from_tuple(row: RowTuple) -> Result<RevocationRow> {
    let bucket_interval = u8::try_from(row.1)
        .map_err(|_| PostgresError::invalid_data(format!("bucket_interval {}", row.1)))?;
    Ok(RevocationRow {
        bucket_date: row.0,
        bucket_interval,
        revocation_type: row.2,
        revocation_data: row.3,
        revoked_by: row.4,
        revoked_at: row.5,
    })
}

#[async_trait]
impl RevocationBackend for PostgresRevocationBackend {
    async fn upsert(&self, row: RevocationRow) -> std::result::Result<(), StorageError> {
        self.insert(&row).await.map_err(StorageError::from)
    }

    async fn scan(
        &self,
        bucket: &Bucket,
        after: EpochMillis,
    ) -> std::result::Result<Vec<RevocationRow>, StorageError> {
        self.select(bucket, after).await.map_err(StorageError::from)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

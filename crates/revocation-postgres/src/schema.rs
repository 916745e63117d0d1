//! Schema management for the PostgreSQL storage backend.
//!
//! The `revocation` table mirrors a wide-column layout: the partition key is
//! `(bucket_date, bucket_interval)`, rows within a partition are clustered by
//! `revoked_at`. The primary key doubles as the index for bucket scans.

use sqlx_core::query::query;
use sqlx_postgres::PgPool;
use tracing::{info, instrument};

use crate::error::Result;

pub const REVOCATION_TABLE: &str = "revocation";
pub const AUTHORIZATION_RULE_TABLE: &str = "authorization_rule";

const CREATE_REVOCATION_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS revocation (
        bucket_date      TEXT     NOT NULL,
        bucket_interval  SMALLINT NOT NULL CHECK (bucket_interval BETWEEN 0 AND 2),
        revoked_at       BIGINT   NOT NULL,
        revoked_by       TEXT     NOT NULL,
        revocation_type  TEXT     NOT NULL,
        revocation_data  TEXT     NOT NULL,
        PRIMARY KEY (bucket_date, bucket_interval, revoked_at, revoked_by)
    )
"#;

const CREATE_AUTHORIZATION_RULE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS authorization_rule (
        id                         UUID PRIMARY KEY,
        required_user_claims       JSONB,
        allowed_revocation_claims  JSONB
    )
"#;

const CREATE_AUTHORIZATION_RULE_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS authorization_rule_allowed_claims_idx
        ON authorization_rule USING GIN (allowed_revocation_claims)
"#;

/// Creates the registry tables if they do not exist. Idempotent.
///
/// # Errors
///
/// Returns an error if a DDL statement fails.
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in [
        CREATE_REVOCATION_TABLE,
        CREATE_AUTHORIZATION_RULE_TABLE,
        CREATE_AUTHORIZATION_RULE_INDEX,
    ] {
        query(statement).execute(pool).await?;
    }

    info!(
        tables = ?[REVOCATION_TABLE, AUTHORIZATION_RULE_TABLE],
        "Revocation schema ready"
    );
    Ok(())
}

//! Storage traits for the revocation storage layer.

use async_trait::async_trait;
use revocation_core::{Bucket, EpochMillis, StoredRevocation};

use crate::error::StorageError;
use crate::types::RevocationRow;

/// The revocation registry as seen by request handlers.
///
/// Implementations hold no per-request state and must be safe to share across
/// tasks (`Send + Sync`). Writes are independent upserts; reads carry no
/// ordering guarantee across buckets.
///
/// # Example
///
/// ```ignore
/// use revocation_storage::{RevocationStore, StorageError};
///
/// async fn poll(store: &dyn RevocationStore, since: i64) -> Result<usize, StorageError> {
///     Ok(store.query(since).await?.len())
/// }
/// ```
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Records a revocation in the bucket of its `revoked_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Encode` if the payload cannot be serialized; in
    /// that case nothing is written. Backend failures are returned as-is.
    async fn put(&self, revocation: &StoredRevocation) -> Result<(), StorageError>;

    /// Returns every revocation with `revoked_at > from`.
    ///
    /// Rows whose payload cannot be decoded are logged and skipped. The result
    /// is unordered.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::RangeTooLarge` without reading anything if `from`
    /// is further back than the configured maximum. Backend failures are
    /// returned as-is.
    async fn query(&self, from: EpochMillis) -> Result<Vec<StoredRevocation>, StorageError>;

    /// Returns the name of the underlying backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

/// A wide-column backing store for revocation rows.
///
/// Backends know nothing about payload formats or buckets beyond using them
/// as partition keys.
#[async_trait]
pub trait RevocationBackend: Send + Sync {
    /// Inserts the row, replacing any row with the same partition key,
    /// `revoked_at` and `revoked_by`.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn upsert(&self, row: RevocationRow) -> Result<(), StorageError>;

    /// Returns the rows of one partition with `revoked_at > after`.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn scan(
        &self,
        bucket: &Bucket,
        after: EpochMillis,
    ) -> Result<Vec<RevocationRow>, StorageError>;

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use revocation_core::{Bucket, EpochMillis};
use revocation_storage::{RevocationBackend, RevocationRow, StorageError};

/// Clustering key within a partition: rows sort by `revoked_at`.
type RowKey = (EpochMillis, String);

/// In-memory wide-column table.
///
/// - One entry per `(bucket_date, bucket_interval)` partition
/// - Rows clustered by `revoked_at`, upserted on `(revoked_at, revoked_by)`
/// - Nothing is ever removed
#[derive(Debug, Default)]
pub struct InMemoryRevocationBackend {
    partitions: DashMap<Bucket, BTreeMap<RowKey, RevocationRow>>,
}

impl InMemoryRevocationBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows across all partitions.
    pub fn len(&self) -> usize {
        self.partitions.iter().map(|p| p.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}

#[async_trait]
impl RevocationBackend for InMemoryRevocationBackend {
    async fn upsert(&self, row: RevocationRow) -> Result<(), StorageError> {
        let key = (row.revoked_at, row.revoked_by.clone());
        self.partitions
            .entry(row.bucket())
            .or_default()
            .insert(key, row);
        Ok(())
    }

    async fn scan(
        &self,
        bucket: &Bucket,
        after: EpochMillis,
    ) -> Result<Vec<RevocationRow>, StorageError> {
        let Some(lower) = after.checked_add(1) else {
            return Ok(Vec::new());
        };
        let Some(partition) = self.partitions.get(bucket) else {
            return Ok(Vec::new());
        };
        Ok(partition
            .range((lower, String::new())..)
            .map(|(_, row)| row.clone())
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revocation_core::clock::from_datetime;
    use revocation_core::{FixedClock, RevocationData, StoredRevocation};
    use revocation_storage::{BucketedRevocationStore, RevocationStore};
    use std::sync::Arc;
    use time::macros::datetime;

    fn row(at: EpochMillis, by: &str, data: &str) -> RevocationRow {
        let bucket = Bucket::for_timestamp(at).unwrap();
        RevocationRow {
            bucket_date: bucket.date,
            bucket_interval: bucket.interval,
            revocation_type: "TOKEN".into(),
            revocation_data: data.into(),
            revoked_by: by.into(),
            revoked_at: at,
        }
    }

    #[tokio::test]
    async fn test_scan_is_partition_scoped() {
        let backend = InMemoryRevocationBackend::new();
        let morning = from_datetime(datetime!(2016-02-16 07:00 UTC));
        let noon = from_datetime(datetime!(2016-02-16 12:00 UTC));
        backend.upsert(row(morning, "a", "{}")).await.unwrap();
        backend.upsert(row(noon, "a", "{}")).await.unwrap();

        let rows = backend
            .scan(&Bucket::new("2016-02-16", 1), 0)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revoked_at, noon);
        assert_eq!(backend.partition_count(), 2);
    }

    #[tokio::test]
    async fn test_scan_excludes_lower_bound() {
        let backend = InMemoryRevocationBackend::new();
        let at = from_datetime(datetime!(2016-02-16 12:00 UTC));
        backend.upsert(row(at, "a", "{}")).await.unwrap();
        backend.upsert(row(at + 1, "a", "{}")).await.unwrap();
        let bucket = Bucket::for_timestamp(at).unwrap();

        let rows = backend.scan(&bucket, at).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].revoked_at, at + 1);

        assert!(backend.scan(&bucket, EpochMillis::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_key() {
        let backend = InMemoryRevocationBackend::new();
        let at = from_datetime(datetime!(2016-02-16 12:00 UTC));
        backend.upsert(row(at, "a", "first")).await.unwrap();
        backend.upsert(row(at, "a", "second")).await.unwrap();
        backend.upsert(row(at, "b", "other")).await.unwrap();

        assert_eq!(backend.len(), 2);
        let rows = backend.scan(&Bucket::for_timestamp(at).unwrap(), 0).await.unwrap();
        assert_eq!(rows[0].revocation_data, "second");
        assert_eq!(rows[1].revoked_by, "b");
    }

    #[tokio::test]
    async fn test_scan_results_sorted_within_bucket() {
        let backend = InMemoryRevocationBackend::new();
        let at = from_datetime(datetime!(2016-02-16 12:00 UTC));
        for offset in [30, 10, 20] {
            backend.upsert(row(at + offset, "a", "{}")).await.unwrap();
        }

        let rows = backend.scan(&Bucket::for_timestamp(at).unwrap(), 0).await.unwrap();
        let times: Vec<_> = rows.iter().map(|r| r.revoked_at - at).collect();
        assert_eq!(times, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_bucketed_store_over_memory() {
        let now = from_datetime(datetime!(2016-02-17 01:00 UTC));
        let clock = Arc::new(FixedClock::new(now));
        let store = BucketedRevocationStore::with_clock(
            InMemoryRevocationBackend::new(),
            24 * 60 * 60 * 1000,
            clock,
        );

        let yesterday = from_datetime(datetime!(2016-02-16 21:00 UTC));
        let token = StoredRevocation::new(RevocationData::token("abc"), "alice", yesterday);
        let global = StoredRevocation::new(RevocationData::global(now), "bob", now);
        store.put(&token).await.unwrap();
        store.put(&global).await.unwrap();

        let mut found = store
            .query(from_datetime(datetime!(2016-02-16 20:00 UTC)))
            .await
            .unwrap();
        found.sort_by_key(StoredRevocation::revoked_at);
        assert_eq!(found, vec![token, global]);
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_create_revocation_store() {
        let store = crate::create_revocation_store(60_000);
        assert_eq!(store.backend_name(), "memory");
        assert!(store.query(0).await.unwrap_err().is_range_too_large());
    }
}

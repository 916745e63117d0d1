//! Time-bucketed revocation store.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use revocation_core::codec;
use revocation_core::{Bucket, Clock, EpochMillis, StoredRevocation, SystemClock, get_buckets};

use crate::error::StorageError;
use crate::traits::{RevocationBackend, RevocationStore};
use crate::types::RevocationRow;

/// [`RevocationStore`] over any [`RevocationBackend`].
///
/// Holds only immutable, process-lifetime state: the backend handle, the
/// clock and the maximum query range.
pub struct BucketedRevocationStore<B> {
    backend: B,
    clock: Arc<dyn Clock>,
    max_time_delta: EpochMillis,
}

impl<B: RevocationBackend> BucketedRevocationStore<B> {
    /// Creates a store reading the system clock.
    pub fn new(backend: B, max_time_delta: EpochMillis) -> Self {
        Self::with_clock(backend, max_time_delta, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit clock.
    pub fn with_clock(backend: B, max_time_delta: EpochMillis, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            max_time_delta,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn max_time_delta(&self) -> EpochMillis {
        self.max_time_delta
    }

    async fn scan_bucket(
        &self,
        bucket: &Bucket,
        from: EpochMillis,
    ) -> Result<Vec<StoredRevocation>, StorageError> {
        tracing::debug!(
            bucket.date = %bucket.date,
            bucket.interval = bucket.interval,
            "selecting bucket"
        );

        let rows = self.backend.scan(bucket, from).await?;
        Ok(rows.into_iter().filter_map(read_row).collect())
    }
}

/// Decodes a scanned row, logging and dropping it if the payload is unreadable.
fn read_row(row: RevocationRow) -> Option<StoredRevocation> {
    match codec::decode_tagged(&row.revocation_type, &row.revocation_data) {
        Ok(data) => Some(StoredRevocation::new(data, row.revoked_by, row.revoked_at)),
        Err(e) => {
            tracing::warn!(
                bucket.date = %row.bucket_date,
                bucket.interval = row.bucket_interval,
                revocation_type = %row.revocation_type,
                revoked_at = row.revoked_at,
                error = %e,
                "Failed to read revocation, skipping row"
            );
            None
        }
    }
}

#[async_trait]
impl<B: RevocationBackend> RevocationStore for BucketedRevocationStore<B> {
    async fn put(&self, revocation: &StoredRevocation) -> Result<(), StorageError> {
        let bucket = Bucket::for_timestamp(revocation.revoked_at())
            .map_err(|e| StorageError::invalid_revocation(e.to_string()))?;

        let data = codec::encode(revocation.data()).map_err(|e| {
            tracing::error!(error = %e, "Failed to serialize revocation data");
            StorageError::encode(e.to_string())
        })?;

        tracing::debug!(
            bucket.date = %bucket.date,
            bucket.interval = bucket.interval,
            revocation_type = %revocation.revocation_type(),
            revoked_at = revocation.revoked_at(),
            "storing revocation"
        );

        self.backend
            .upsert(RevocationRow {
                bucket_date: bucket.date,
                bucket_interval: bucket.interval,
                revocation_type: revocation.revocation_type().to_string(),
                revocation_data: data,
                revoked_by: revocation.revoked_by().to_string(),
                revoked_at: revocation.revoked_at(),
            })
            .await
    }

    async fn query(&self, from: EpochMillis) -> Result<Vec<StoredRevocation>, StorageError> {
        let now = self.clock.now_millis();
        if now.saturating_sub(from) > self.max_time_delta {
            tracing::debug!(
                from,
                now,
                max_time_delta = self.max_time_delta,
                "from timestamp is too old"
            );
            return Err(StorageError::range_too_large(from, now, self.max_time_delta));
        }

        let buckets = get_buckets(from, now).map_err(|e| {
            tracing::debug!(from, now, error = %e, "from timestamp has no bucket");
            StorageError::invalid_range(e.to_string())
        })?;

        let scanned =
            try_join_all(buckets.iter().map(|bucket| self.scan_bucket(bucket, from))).await?;

        Ok(scanned.into_iter().flatten().collect())
    }

    fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use revocation_core::clock::from_datetime;
    use revocation_core::{BUCKET_LENGTH_MS, FixedClock, RevocationData};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::macros::datetime;

    const DAY: EpochMillis = 24 * 60 * 60 * 1000;

    #[derive(Default)]
    struct RecordingBackend {
        rows: Mutex<Vec<RevocationRow>>,
        scans: AtomicUsize,
        fail_scans: bool,
    }

    impl RecordingBackend {
        fn failing() -> Self {
            Self {
                fail_scans: true,
                ..Self::default()
            }
        }

        fn insert_raw(&self, at: EpochMillis, revocation_type: &str, data: &str) {
            let bucket = Bucket::for_timestamp(at).unwrap();
            self.rows.lock().unwrap().push(RevocationRow {
                bucket_date: bucket.date,
                bucket_interval: bucket.interval,
                revocation_type: revocation_type.to_string(),
                revocation_data: data.to_string(),
                revoked_by: "test".to_string(),
                revoked_at: at,
            });
        }
    }

    #[async_trait]
    impl RevocationBackend for RecordingBackend {
        async fn upsert(&self, row: RevocationRow) -> Result<(), StorageError> {
            self.rows.lock().unwrap().push(row);
            Ok(())
        }

        async fn scan(
            &self,
            bucket: &Bucket,
            after: EpochMillis,
        ) -> Result<Vec<RevocationRow>, StorageError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if self.fail_scans {
                return Err(StorageError::connection("no hosts available"));
            }
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| row.is_in(bucket) && row.revoked_at > after)
                .cloned()
                .collect())
        }

        fn backend_name(&self) -> &'static str {
            "recording"
        }
    }

    fn now() -> EpochMillis {
        from_datetime(datetime!(2016-02-17 10:00 UTC))
    }

    fn store(backend: RecordingBackend) -> BucketedRevocationStore<RecordingBackend> {
        BucketedRevocationStore::with_clock(backend, 2 * DAY, Arc::new(FixedClock::new(now())))
    }

    fn global(at: EpochMillis) -> StoredRevocation {
        StoredRevocation::new(RevocationData::global(at), "test", at)
    }

    #[tokio::test]
    async fn test_put_writes_into_bucket_of_revoked_at() {
        let store = store(RecordingBackend::default());
        let at = from_datetime(datetime!(2016-02-16 21:00 UTC));
        store
            .put(&StoredRevocation::new(RevocationData::token("h"), "alice", at))
            .await
            .unwrap();

        let rows = store.backend().rows.lock().unwrap().clone();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket(), Bucket::new("2016-02-16", 2));
        assert_eq!(rows[0].revocation_type, "TOKEN");
        assert_eq!(rows[0].revocation_data, r#"{"token_hash":"h"}"#);
        assert_eq!(rows[0].revoked_by, "alice");
        assert_eq!(rows[0].revoked_at, at);
    }

    #[tokio::test]
    async fn test_query_roundtrip() {
        let store = store(RecordingBackend::default());
        let at = now() - 1_000;
        let claim = StoredRevocation::new(RevocationData::claim("uid", "x", at), "bob", at);
        store.put(&claim).await.unwrap();

        let found = store.query(now() - DAY).await.unwrap();
        assert_eq!(found, vec![claim]);
    }

    #[tokio::test]
    async fn test_query_lower_bound_is_exclusive() {
        let store = store(RecordingBackend::default());
        let from = now() - 60_000;
        store.put(&global(from)).await.unwrap();
        store.put(&global(from + 1)).await.unwrap();

        let found = store.query(from).await.unwrap();
        assert_eq!(found, vec![global(from + 1)]);
    }

    #[tokio::test]
    async fn test_query_collects_every_bucket() {
        let store = store(RecordingBackend::default());
        let from = now() - DAY;
        let mut expected = Vec::new();
        for step in 1..=3 {
            let revocation = global(from + step * BUCKET_LENGTH_MS);
            store.put(&revocation).await.unwrap();
            expected.push(revocation);
        }

        let mut found = store.query(from).await.unwrap();
        found.sort_by_key(StoredRevocation::revoked_at);
        assert_eq!(found, expected);
        assert_eq!(store.backend().scans.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_query_range_too_large_reads_nothing() {
        let store = store(RecordingBackend::default());

        let err = store.query(now() - 2 * DAY - 1).await.unwrap_err();
        assert!(err.is_range_too_large());
        assert_eq!(store.backend().scans.load(Ordering::SeqCst), 0);

        assert!(store.query(now() - 2 * DAY).await.is_ok());
    }

    #[tokio::test]
    async fn test_query_far_past_does_not_overflow() {
        let store = store(RecordingBackend::default());
        let err = store.query(EpochMillis::MIN).await.unwrap_err();
        assert!(err.is_range_too_large());
    }

    #[tokio::test]
    async fn test_query_far_future_is_rejected_as_invalid_range() {
        let store = store(RecordingBackend::default());
        // 10000-01-01T00:00:00Z, past the last representable date
        let err = store.query(253_402_300_800_000).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidRange { .. }));
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(store.backend().scans.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_query_skips_undecodable_rows() {
        let backend = RecordingBackend::default();
        let from = now() - DAY;
        let first = from + 1_000;
        let second = now() - 1_000;
        backend.insert_raw(first, "GLOBAL", &format!(r#"{{"issued_before":{first}}}"#));
        backend.insert_raw(first + 1, "GLOBAL", "{broken");
        backend.insert_raw(first + 2, "CLAIM", r#"{"token_hash":"h"}"#);
        backend.insert_raw(second - 1, "SESSION", r#"{"issued_before":1}"#);
        backend.insert_raw(second, "TOKEN", r#"{"token_hash":"h"}"#);
        let store = store(backend);

        let mut found = store.query(from).await.unwrap();
        found.sort_by_key(StoredRevocation::revoked_at);
        assert_eq!(
            found,
            vec![
                global(first),
                StoredRevocation::new(RevocationData::token("h"), "test", second),
            ]
        );
    }

    #[tokio::test]
    async fn test_query_propagates_backend_errors() {
        let store = store(RecordingBackend::failing());
        let err = store.query(now() - 1_000).await.unwrap_err();
        assert!(matches!(err, StorageError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_backend_name() {
        assert_eq!(store(RecordingBackend::default()).backend_name(), "recording");
    }
}

//! Row-level types shared by storage backends.

use revocation_core::{Bucket, EpochMillis};

/// One row of the `revocation` table, as written and scanned by backends.
///
/// Partitioned by `(bucket_date, bucket_interval)` and clustered by
/// `revoked_at`. `revocation_data` is opaque to the backend; only
/// [`crate::BucketedRevocationStore`] interprets it, using `revocation_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevocationRow {
    /// UTC calendar day of the partition, `YYYY-MM-DD`.
    pub bucket_date: String,
    /// 8-hour interval of the partition, `0..=2`.
    pub bucket_interval: u8,
    /// Payload type tag (`TOKEN`, `CLAIM`, `GLOBAL`).
    pub revocation_type: String,
    /// Serialized payload.
    pub revocation_data: String,
    /// Who registered the revocation.
    pub revoked_by: String,
    /// When the revocation was registered, epoch milliseconds.
    pub revoked_at: EpochMillis,
}

impl RevocationRow {
    /// The partition this row belongs to.
    #[must_use]
    pub fn bucket(&self) -> Bucket {
        Bucket::new(self.bucket_date.clone(), self.bucket_interval)
    }

    /// Returns `true` if the row lives in `bucket`.
    #[must_use]
    pub fn is_in(&self, bucket: &Bucket) -> bool {
        self.bucket_date == bucket.date && self.bucket_interval == bucket.interval
    }
}

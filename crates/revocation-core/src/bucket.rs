//! Time partitioning.
//!
//! Revocations are partitioned into fixed 8-hour buckets identified by the UTC
//! calendar day and an interval index: 0 covers hours `[0, 8)`, 1 covers
//! `[8, 16)` and 2 covers `[16, 24)`. A query for everything after `from`
//! only needs the buckets between `from` and now, which bounds read fan-out
//! at the cost of concentrating all writes of an 8-hour window in one
//! partition.

use std::fmt;

use crate::clock::{EpochMillis, MILLIS_PER_HOUR, utc_date_string};
use crate::error::Result;

/// Length of a bucket: 8 hours.
pub const BUCKET_LENGTH_MS: EpochMillis = 8 * MILLIS_PER_HOUR;

/// A storage partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bucket {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// 8-hour window within the day, in `0..=2`.
    pub interval: u8,
}

impl Bucket {
    #[must_use]
    pub fn new(date: impl Into<String>, interval: u8) -> Self {
        Self {
            date: date.into(),
            interval,
        }
    }

    /// The bucket a timestamp falls into.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be represented as a date.
    pub fn for_timestamp(timestamp: EpochMillis) -> Result<Self> {
        Ok(Self {
            date: utc_date_string(timestamp)?,
            interval: interval_of(timestamp),
        })
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.date, self.interval)
    }
}

/// Interval index of a timestamp within its UTC day.
#[must_use]
pub fn interval_of(timestamp: EpochMillis) -> u8 {
    let hour_of_day = timestamp.div_euclid(MILLIS_PER_HOUR).rem_euclid(24);
    (hour_of_day / 8) as u8
}

/// Computes the ordered buckets to scan for the range `from..=current`.
///
/// Steps forward from `from` in bucket-sized increments until reaching the
/// first bucket boundary after `current`. Always yields at least one bucket.
/// Callers are expected to bound `current - from` beforehand.
///
/// # Errors
///
/// Returns an error if a stepped timestamp cannot be represented as a date.
pub fn get_buckets(from: EpochMillis, current: EpochMillis) -> Result<Vec<Bucket>> {
    let max_time = current.div_euclid(BUCKET_LENGTH_MS) * BUCKET_LENGTH_MS + BUCKET_LENGTH_MS;
    tracing::debug!(current, max_time, "computing buckets");

    let mut buckets = Vec::new();
    let mut cursor = from;
    loop {
        let bucket = Bucket::for_timestamp(cursor)?;
        tracing::debug!(bucket.date = %bucket.date, bucket.interval = bucket.interval, "adding bucket");
        buckets.push(bucket);

        cursor += BUCKET_LENGTH_MS;
        if cursor >= max_time {
            break;
        }
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::from_datetime;
    use time::macros::datetime;

    #[test]
    fn test_same_interval() {
        let from = from_datetime(datetime!(2016-02-16 14:00 UTC));
        let current = from_datetime(datetime!(2016-02-16 14:30 UTC));

        let buckets = get_buckets(from, current).unwrap();
        assert_eq!(buckets, vec![Bucket::new("2016-02-16", 1)]);
    }

    #[test]
    fn test_from_equals_current() {
        let now = from_datetime(datetime!(2016-02-16 03:17 UTC));

        let buckets = get_buckets(now, now).unwrap();
        assert_eq!(buckets, vec![Bucket::new("2016-02-16", 0)]);
    }

    #[test]
    fn test_two_intervals_same_day() {
        let from = from_datetime(datetime!(2016-02-16 14:00 UTC));
        let current = from_datetime(datetime!(2016-02-16 16:00 UTC));

        let buckets = get_buckets(from, current).unwrap();
        assert_eq!(
            buckets,
            vec![Bucket::new("2016-02-16", 1), Bucket::new("2016-02-16", 2)]
        );
    }

    #[test]
    fn test_two_intervals_next_day() {
        let from = from_datetime(datetime!(2016-02-16 21:00 UTC));
        let current = from_datetime(datetime!(2016-02-17 01:00 UTC));

        let buckets = get_buckets(from, current).unwrap();
        assert_eq!(
            buckets,
            vec![Bucket::new("2016-02-16", 2), Bucket::new("2016-02-17", 0)]
        );
    }

    #[test]
    fn test_full_day() {
        let from = from_datetime(datetime!(2016-02-16 01:00 UTC));
        let current = from_datetime(datetime!(2016-02-17 01:00 UTC));

        let buckets = get_buckets(from, current).unwrap();
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0], Bucket::new("2016-02-16", 0));
        assert_eq!(buckets[3], Bucket::new("2016-02-17", 0));
    }

    #[test]
    fn test_unaligned_start_covers_current() {
        let from = from_datetime(datetime!(2016-02-16 07:59 UTC));
        let current = from_datetime(datetime!(2016-02-16 16:01 UTC));

        let buckets = get_buckets(from, current).unwrap();
        assert_eq!(
            buckets,
            vec![
                Bucket::new("2016-02-16", 0),
                Bucket::new("2016-02-16", 1),
                Bucket::new("2016-02-16", 2),
            ]
        );
    }

    #[test]
    fn test_interval_boundaries() {
        let day = from_datetime(datetime!(2016-02-16 00:00 UTC));
        assert_eq!(interval_of(day), 0);
        assert_eq!(interval_of(day + BUCKET_LENGTH_MS - 1), 0);
        assert_eq!(interval_of(day + BUCKET_LENGTH_MS), 1);
        assert_eq!(interval_of(day + 2 * BUCKET_LENGTH_MS), 2);
        assert_eq!(interval_of(day + 3 * BUCKET_LENGTH_MS - 1), 2);
        assert_eq!(interval_of(day + 3 * BUCKET_LENGTH_MS), 0);
    }

    #[test]
    fn test_interval_before_epoch() {
        // 1969-12-31 23:00 UTC
        assert_eq!(interval_of(-MILLIS_PER_HOUR), 2);
        assert_eq!(
            Bucket::for_timestamp(-MILLIS_PER_HOUR).unwrap(),
            Bucket::new("1969-12-31", 2)
        );
    }

    #[test]
    fn test_bucket_display() {
        assert_eq!(Bucket::new("2016-02-16", 2).to_string(), "2016-02-16/2");
    }
}

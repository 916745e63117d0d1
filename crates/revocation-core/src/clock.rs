//! Epoch-millisecond time helpers.
//!
//! Revocation timestamps are carried as milliseconds since the Unix epoch
//! (UTC). The [`Clock`] trait lets the store ask for "now" without reading the
//! system time directly, so range checks can be driven deterministically.

use std::sync::atomic::{AtomicI64, Ordering};

use time::OffsetDateTime;
use time::macros::format_description;

use crate::error::{CoreError, Result};

/// Milliseconds since the Unix epoch, UTC.
pub type EpochMillis = i64;

pub const MILLIS_PER_HOUR: EpochMillis = 60 * 60 * 1000;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time in epoch milliseconds.
    fn now_millis(&self) -> EpochMillis;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> EpochMillis {
        now_millis()
    }
}

/// A clock frozen at a settable instant.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn new(now: EpochMillis) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn set(&self, now: EpochMillis) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: EpochMillis) {
        self.0.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> EpochMillis {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn now_millis() -> EpochMillis {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as EpochMillis
}

pub fn to_datetime(millis: EpochMillis) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).map_err(|e| {
        CoreError::invalid_timestamp(format!("{millis} is out of range: {e}"))
    })
}

pub fn from_datetime(datetime: OffsetDateTime) -> EpochMillis {
    (datetime.unix_timestamp_nanos() / 1_000_000) as EpochMillis
}

/// Formats the UTC calendar day of `millis` as `YYYY-MM-DD`.
pub fn utc_date_string(millis: EpochMillis) -> Result<String> {
    let format = format_description!("[year]-[month]-[day]");
    to_datetime(millis)?
        .date()
        .format(&format)
        .map_err(|e| CoreError::invalid_timestamp(format!("cannot format {millis}: {e}")))
}

//! # revocation-core
//!
//! Core types for the revocation registry.
//!
//! - [`revocation`] - the stored revocation record and its tagged payload
//! - [`bucket`] - fixed 8-hour time partitions and bucket-set computation
//! - [`codec`] - tag-dispatched payload encoding/decoding
//! - [`clock`] - epoch-millisecond helpers and the injectable [`Clock`]
//! - [`hash`] - salted hashing of token and claim values

pub mod bucket;
pub mod clock;
pub mod codec;
pub mod error;
pub mod hash;
pub mod revocation;

pub use bucket::{BUCKET_LENGTH_MS, Bucket, get_buckets};
pub use clock::{Clock, EpochMillis, FixedClock, SystemClock};
pub use error::{CoreError, Result};
pub use hash::hash_value;
pub use revocation::{
    ClaimRevocationData, GlobalRevocationData, RevocationData, RevocationType, StoredRevocation,
    TokenRevocationData,
};

//! # revocation-storage
//!
//! Storage abstraction layer for the revocation registry.
//!
//! ## Overview
//!
//! [`RevocationStore`] is what request handlers talk to: `put` a revocation,
//! `query` everything revoked after a timestamp. [`BucketedRevocationStore`]
//! implements it once for every backend: it computes 8-hour buckets, encodes
//! and decodes payloads, enforces the maximum query range, and absorbs
//! undecodable rows. Backends only implement [`RevocationBackend`], the
//! wide-column capability of upserting a row and scanning one partition.
//!
//! ## Example
//!
//! ```ignore
//! use revocation_storage::{BucketedRevocationStore, RevocationStore};
//!
//! let store = BucketedRevocationStore::new(backend, max_time_delta_ms);
//! store.put(&revocation).await?;
//! let revoked = store.query(last_poll).await?;
//! ```

mod bucketed;
mod error;
mod traits;
mod types;

pub use bucketed::BucketedRevocationStore;
pub use error::{ErrorCategory, StorageError};
pub use traits::{RevocationBackend, RevocationStore};
pub use types::RevocationRow;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shareable revocation store.
pub type DynRevocationStore = std::sync::Arc<dyn RevocationStore>;

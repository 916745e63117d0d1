//! In-memory revocation backend.
//!
//! This crate provides an in-memory implementation of the `RevocationBackend`
//! trait from `revocation-storage`, using a `DashMap` of partitions for
//! concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use revocation_db_memory::create_revocation_store;
//!
//! let store = create_revocation_store(7 * 24 * 60 * 60 * 1000);
//! store.put(&revocation).await?;
//! ```

pub mod backend;

pub use backend::InMemoryRevocationBackend;

use revocation_core::EpochMillis;
use revocation_storage::{BucketedRevocationStore, DynRevocationStore};

/// Creates a new in-memory revocation store reading the system clock.
pub fn create_revocation_store(max_time_delta: EpochMillis) -> DynRevocationStore {
    std::sync::Arc::new(BucketedRevocationStore::new(
        InMemoryRevocationBackend::new(),
        max_time_delta,
    ))
}

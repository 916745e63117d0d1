//! # revocation-server
//!
//! HTTP surface of the revocation registry.
//!
//! - `GET /revocations?from=<epoch ms>` lists revocations registered after `from`
//! - `POST /revocations` registers a token, claim or global revocation
//! - `GET /healthz` reports liveness

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod observability;
pub mod server;

pub use config::{
    AppConfig, AuthorizationConfig, LoggingConfig, RevocationSettings, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use error::ApiError;
pub use observability::init_tracing;
pub use server::{AppState, RevocationServer, ServerBuilder, build_app};

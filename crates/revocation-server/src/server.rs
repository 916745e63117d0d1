use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use revocation_auth::{
    AuthorizationRule, ClaimRevocationAuthorizer, DynRulesStore, InMemoryAuthorizationRulesStore,
};
use revocation_core::{Clock, SystemClock};
use revocation_db_memory::InMemoryRevocationBackend;
use revocation_postgres::PostgresRevocationStorage;
use revocation_storage::{BucketedRevocationStore, DynRevocationStore};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, StorageBackend};
use crate::handlers;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: DynRevocationStore,
    pub authorizer: Arc<ClaimRevocationAuthorizer>,
    pub clock: Arc<dyn Clock>,
    pub hash_salt: Arc<str>,
}

impl AppState {
    /// Builds the state for `cfg` reading the system clock.
    pub async fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Self::from_config_with_clock(cfg, Arc::new(SystemClock)).await
    }

    /// Connects the configured backend and seeds the configured rules.
    pub async fn from_config_with_clock(
        cfg: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let max_time_delta = cfg.revocation.max_time_delta_ms;

        let (store, rules): (DynRevocationStore, DynRulesStore) = match cfg.storage.backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                (
                    Arc::new(BucketedRevocationStore::with_clock(
                        InMemoryRevocationBackend::new(),
                        max_time_delta,
                        Arc::clone(&clock),
                    )),
                    Arc::new(InMemoryAuthorizationRulesStore::new()),
                )
            }
            StorageBackend::Postgres => {
                let storage = PostgresRevocationStorage::connect(&cfg.storage.postgres).await?;
                storage.ensure_schema().await?;
                tracing::info!("Using PostgreSQL storage");
                (
                    Arc::new(BucketedRevocationStore::with_clock(
                        storage.revocations(),
                        max_time_delta,
                        Arc::clone(&clock),
                    )),
                    Arc::new(storage.rules()),
                )
            }
        };

        seed_rules(&rules, &cfg.authorization.rules).await?;

        Ok(Self {
            store,
            authorizer: Arc::new(ClaimRevocationAuthorizer::new(rules)),
            clock,
            hash_salt: Arc::from(cfg.revocation.hash_salt.as_str()),
        })
    }
}

/// Stores every configured rule that is not stored yet.
pub async fn seed_rules(
    rules: &DynRulesStore,
    configured: &[AuthorizationRule],
) -> anyhow::Result<()> {
    let existing = rules.list().await?;
    let mut added = 0usize;
    for rule in configured {
        if !existing.contains(rule) {
            rules.store(rule.clone()).await?;
            added += 1;
        }
    }
    tracing::info!(
        configured = configured.len(),
        added,
        "Authorization rules seeded"
    );
    Ok(())
}

pub fn build_app(state: AppState, cfg: &AppConfig) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/revocations",
            get(handlers::get_revocations).post(handlers::post_revocation),
        )
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
}

pub struct RevocationServer {
    addr: SocketAddr,
    app: Router,
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
        }
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub async fn build(self) -> anyhow::Result<RevocationServer> {
        let state = AppState::from_config(&self.config).await?;
        let app = build_app(state, &self.config);

        Ok(RevocationServer {
            addr: self.addr,
            app,
        })
    }
}

impl RevocationServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

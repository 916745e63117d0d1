// Tracing setup. The configured level is applied after config load through a
// reload handle; RUST_LOG, when set, wins over both.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Dependency targets held below the configured level.
const QUIET_TARGETS: &str = "sqlx=warn";

/// Filter for `level` with noisy dependency targets held back.
pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(format!("{level},{QUIET_TARGETS}"))
}

pub fn init_tracing() {
    let base_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for("info"));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Apply `logging.level`, unless RUST_LOG was set.
pub fn apply_logging_level(level: &str) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let _ = handle.modify(|f| *f = filter_for(level));
    }
}

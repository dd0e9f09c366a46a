//! `tracing` subscriber installation.
//!
//! `RUST_LOG` takes precedence over the configured level so operators can
//! raise verbosity for one module without editing the config file.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter from `RUST_LOG`, falling back to `log_level`, then to `info`.
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global fmt subscriber. Leaves an already-installed global
/// subscriber in place.
pub fn init_tracing(log_level: &str) {
    let installed = fmt().with_env_filter(env_filter(log_level)).try_init();
    if installed.is_ok() {
        tracing::debug!(log_level, "tracing initialised");
    }
}

pub fn init_tracing_from_config(config: &ObservabilityConfig) {
    init_tracing(&config.log_level);
}

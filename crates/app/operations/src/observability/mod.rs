//! Tracing set-up.

pub mod logging;

pub use logging::{env_filter, init_tracing, init_tracing_from_config};

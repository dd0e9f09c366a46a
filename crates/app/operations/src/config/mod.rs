//! Configuration loading and validation.
//!
//! This module provides:
//! - Configuration types with serde support
//! - YAML file loading
//! - Validation that collects all errors before failing

mod loader;
pub mod types;
mod validation;

pub use loader::{load_config, load_config_from_str};
pub use types::{ChainConfig, Eip712Config, ObservabilityConfig, PresentationConfig, VmConfig};
pub use validation::validate_config;

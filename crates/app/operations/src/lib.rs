//! Operations infrastructure for vmauth chains.
//!
//! - **Config**: YAML configuration with validation that reports every
//!   problem at once
//! - **Observability**: `tracing` subscriber set-up
//! - **Startup**: builds the shared [`Runtime`] (rules, typed-data settings,
//!   type registry) from a loaded config
//!
//! # Example
//!
//! ```no_run
//! use vmauth_operations::{init_tracing_from_config, load_config, run_startup_sequence};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("config.yaml")?;
//!     init_tracing_from_config(&config.observability);
//!
//!     let runtime = run_startup_sequence(&config)?;
//!     println!("{} auth schemes registered", runtime.registry.auths.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod observability;
pub mod startup;

pub use config::{load_config, load_config_from_str, VmConfig};
pub use errors::{ConfigError, StartupError};
pub use observability::{init_tracing, init_tracing_from_config};
pub use startup::{run_startup_sequence, Runtime};

//! Configuration validation.
//!
//! Validates configuration and collects all errors before returning,
//! enabling users to fix multiple issues in a single iteration.

use tracing_subscriber::EnvFilter;
use vmauth_auth::eth_address_from_str;
use vmauth_chain::MAX_ACTIONS;
use vmauth_codec::Id;

use crate::config::types::{
    ChainConfig, Eip712Config, ObservabilityConfig, PresentationConfig, VmConfig,
};
use crate::errors::ConfigError;

/// Largest decimals value whose scale still fits in a `u64`.
const MAX_DECIMALS: u8 = 19;

/// Bech32 allows HRPs of 1 to 83 printable ASCII characters.
const MAX_HRP_LEN: usize = 83;

/// Validate the entire configuration.
///
/// Collects all validation errors and returns them together.
pub fn validate_config(config: &VmConfig) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    validate_chain_config(&config.chain, &mut errors);
    validate_presentation_config(&config.presentation, &mut errors);
    validate_eip712_config(&config.eip712, &mut errors);
    validate_observability_config(&config.observability, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationFailed(errors))
    }
}

fn validate_chain_config(config: &ChainConfig, errors: &mut Vec<String>) {
    if let Err(e) = Id::from_cb58(&config.chain_id) {
        errors.push(format!(
            "chain.chain_id '{}' is not a valid CB58 id: {e}",
            config.chain_id
        ));
    }

    if config.validity_window_ms <= 0 {
        errors.push("chain.validity_window_ms must be greater than 0".to_string());
    }

    if config.max_actions_per_tx == 0 || config.max_actions_per_tx > MAX_ACTIONS {
        errors.push(format!(
            "chain.max_actions_per_tx must be between 1 and {MAX_ACTIONS}"
        ));
    }

    if config.max_tx_size == 0 {
        errors.push("chain.max_tx_size must be greater than 0".to_string());
    }
}

fn validate_presentation_config(config: &PresentationConfig, errors: &mut Vec<String>) {
    if config.hrp.is_empty() || config.hrp.len() > MAX_HRP_LEN {
        errors.push(format!(
            "presentation.hrp must be 1 to {MAX_HRP_LEN} characters"
        ));
    }

    if config.hrp.bytes().any(|b| !(33..=126).contains(&b) || b.is_ascii_uppercase()) {
        errors.push(format!(
            "presentation.hrp '{}' must be lowercase printable ASCII",
            config.hrp
        ));
    }

    if config.decimals > MAX_DECIMALS {
        errors.push(format!(
            "presentation.decimals must be at most {MAX_DECIMALS}"
        ));
    }
}

fn validate_eip712_config(config: &Eip712Config, errors: &mut Vec<String>) {
    if config.domain_name.is_empty() {
        errors.push("eip712.domain_name cannot be empty".to_string());
    }

    if config.domain_version.is_empty() {
        errors.push("eip712.domain_version cannot be empty".to_string());
    }

    if let Err(e) = eth_address_from_str(&config.verifying_contract) {
        errors.push(format!("eip712.verifying_contract: {e}"));
    }

    if config.max_safe_chain_id == 0 {
        errors.push("eip712.max_safe_chain_id must be greater than 0".to_string());
    }
}

fn validate_observability_config(config: &ObservabilityConfig, errors: &mut Vec<String>) {
    if let Err(e) = EnvFilter::try_new(&config.log_level) {
        errors.push(format!(
            "observability.log_level '{}' is not a valid filter: {e}",
            config.log_level
        ));
    }
}

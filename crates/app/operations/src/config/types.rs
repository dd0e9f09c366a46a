//! Configuration types for a vmauth chain.

use serde::Deserialize;
use vmauth_auth::consts::{DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION, MAX_SAFE_CHAIN_ID};
use vmauth_auth::{eth_address_from_str, TypedTxSettings};
use vmauth_chain::rules::{
    DEFAULT_BASE_COMPUTE_UNITS, DEFAULT_MAX_ACTIONS_PER_TX, DEFAULT_MAX_TX_SIZE,
    DEFAULT_VALIDITY_WINDOW_MS,
};
use vmauth_chain::StaticRules;
use vmauth_codec::presentation::{DEFAULT_DECIMALS, DEFAULT_HRP};
use vmauth_codec::{Id, Presentation};

use crate::errors::ConfigError;

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VmConfig {
    /// Chain identity and transaction limits.
    pub chain: ChainConfig,

    /// How addresses and balances are rendered.
    #[serde(default)]
    pub presentation: PresentationConfig,

    /// EIP-712 domain used by the typed-data auth.
    #[serde(default)]
    pub eip712: Eip712Config,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl VmConfig {
    /// Typed-data settings combining the presentation and domain sections.
    pub fn typed_tx_settings(&self) -> Result<TypedTxSettings, ConfigError> {
        Ok(TypedTxSettings {
            presentation: self.presentation.to_presentation(),
            domain_name: self.eip712.domain_name.clone(),
            domain_version: self.eip712.domain_version.clone(),
            verifying_contract: eth_address_from_str(&self.eip712.verifying_contract).map_err(
                |e| ConfigError::Invalid {
                    field: "eip712.verifying_contract",
                    reason: e.to_string(),
                },
            )?,
            max_safe_chain_id: self.eip712.max_safe_chain_id,
        })
    }
}

/// Chain identity and per-transaction limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainConfig {
    /// CB58-encoded chain id.
    pub chain_id: String,

    /// How far in the future a transaction timestamp may be. Default: 60s.
    #[serde(default = "ChainConfig::default_validity_window_ms")]
    pub validity_window_ms: i64,

    /// Default: 16.
    #[serde(default = "ChainConfig::default_max_actions_per_tx")]
    pub max_actions_per_tx: usize,

    /// Units charged to every transaction before actions and auth.
    #[serde(default = "ChainConfig::default_base_compute_units")]
    pub base_compute_units: u64,

    /// Maximum wire size in bytes. Default: 2MB.
    #[serde(default = "ChainConfig::default_max_tx_size")]
    pub max_tx_size: usize,
}

impl ChainConfig {
    const fn default_validity_window_ms() -> i64 {
        DEFAULT_VALIDITY_WINDOW_MS
    }

    const fn default_max_actions_per_tx() -> usize {
        DEFAULT_MAX_ACTIONS_PER_TX
    }

    const fn default_base_compute_units() -> u64 {
        DEFAULT_BASE_COMPUTE_UNITS
    }

    const fn default_max_tx_size() -> usize {
        DEFAULT_MAX_TX_SIZE
    }

    pub fn parse_chain_id(&self) -> Result<Id, ConfigError> {
        Id::from_cb58(&self.chain_id).map_err(|e| ConfigError::Invalid {
            field: "chain.chain_id",
            reason: e.to_string(),
        })
    }

    /// Convert to the rules the transaction model checks against.
    pub fn to_rules(&self) -> Result<StaticRules, ConfigError> {
        Ok(StaticRules {
            chain_id: self.parse_chain_id()?,
            validity_window_ms: self.validity_window_ms,
            max_actions_per_tx: self.max_actions_per_tx,
            base_compute_units: self.base_compute_units,
            max_tx_size: self.max_tx_size,
        })
    }
}

/// Address prefix and balance scaling.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresentationConfig {
    /// Bech32 human-readable prefix. Default: "morpheus".
    #[serde(default = "PresentationConfig::default_hrp")]
    pub hrp: String,

    /// Implied decimals of balances. Default: 9.
    #[serde(default = "PresentationConfig::default_decimals")]
    pub decimals: u8,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            hrp: Self::default_hrp(),
            decimals: Self::default_decimals(),
        }
    }
}

impl PresentationConfig {
    fn default_hrp() -> String {
        DEFAULT_HRP.to_string()
    }

    const fn default_decimals() -> u8 {
        DEFAULT_DECIMALS
    }

    pub fn to_presentation(&self) -> Presentation {
        Presentation {
            hrp: self.hrp.clone(),
            decimals: self.decimals,
        }
    }
}

/// EIP-712 domain. Signers and verifiers must agree on every field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Eip712Config {
    #[serde(default = "Eip712Config::default_domain_name")]
    pub domain_name: String,

    #[serde(default = "Eip712Config::default_domain_version")]
    pub domain_version: String,

    /// `0x`-prefixed hex address. Default: the zero address.
    #[serde(default = "Eip712Config::default_verifying_contract")]
    pub verifying_contract: String,

    /// Chain ids are reduced modulo this value before entering the domain.
    #[serde(default = "Eip712Config::default_max_safe_chain_id")]
    pub max_safe_chain_id: u64,
}

impl Default for Eip712Config {
    fn default() -> Self {
        Self {
            domain_name: Self::default_domain_name(),
            domain_version: Self::default_domain_version(),
            verifying_contract: Self::default_verifying_contract(),
            max_safe_chain_id: Self::default_max_safe_chain_id(),
        }
    }
}

impl Eip712Config {
    fn default_domain_name() -> String {
        DEFAULT_DOMAIN_NAME.to_string()
    }

    fn default_domain_version() -> String {
        DEFAULT_DOMAIN_VERSION.to_string()
    }

    fn default_verifying_contract() -> String {
        format!("0x{}", "00".repeat(20))
    }

    const fn default_max_safe_chain_id() -> u64 {
        MAX_SAFE_CHAIN_ID
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive. Default: info.
    #[serde(default = "ObservabilityConfig::default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
        }
    }
}

impl ObservabilityConfig {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CHAIN_ID: &str = "2c7iUW3kCDwRA9ZFd5bjZZc8iDy68uAsFSBahjqSZGttiTDSNH";

    fn chain_config() -> ChainConfig {
        ChainConfig {
            chain_id: CHAIN_ID.to_string(),
            validity_window_ms: ChainConfig::default_validity_window_ms(),
            max_actions_per_tx: ChainConfig::default_max_actions_per_tx(),
            base_compute_units: ChainConfig::default_base_compute_units(),
            max_tx_size: ChainConfig::default_max_tx_size(),
        }
    }

    #[test]
    fn test_default_presentation() {
        let config = PresentationConfig::default();
        assert_eq!(config.hrp, "morpheus");
        assert_eq!(config.decimals, 9);
        assert_eq!(config.to_presentation(), Presentation::default());
    }

    #[test]
    fn test_default_eip712() {
        let config = Eip712Config::default();
        assert_eq!(config.domain_name, "HyperSDK");
        assert_eq!(config.domain_version, "1");
        assert_eq!(config.max_safe_chain_id, 4_503_599_627_370_476);
        assert_eq!(config.verifying_contract.len(), 42);
    }

    #[test]
    fn test_rules_conversion() {
        let rules = chain_config().to_rules().unwrap();
        assert_eq!(rules, StaticRules::new(CHAIN_ID.parse().unwrap()));
    }

    #[test]
    fn test_bad_chain_id_conversion() {
        let config = ChainConfig {
            chain_id: "not-cb58".to_string(),
            ..chain_config()
        };
        assert!(matches!(
            config.to_rules(),
            Err(ConfigError::Invalid {
                field: "chain.chain_id",
                ..
            })
        ));
    }

    #[test]
    fn test_typed_tx_settings_match_defaults() {
        let config = VmConfig {
            chain: chain_config(),
            presentation: PresentationConfig::default(),
            eip712: Eip712Config::default(),
            observability: ObservabilityConfig::default(),
        };
        assert_eq!(config.typed_tx_settings().unwrap(), TypedTxSettings::default());
    }
}

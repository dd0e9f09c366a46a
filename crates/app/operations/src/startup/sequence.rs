//! Startup sequence orchestration.

use std::sync::Arc;
use vmauth_actions::register_actions;
use vmauth_auth::{register_auths, TypedTxSettings};
use vmauth_chain::{Registry, StaticRules};
use vmauth_codec::Presentation;

use crate::config::VmConfig;
use crate::errors::StartupError;

/// Everything a verifier needs, built once and then shared read-only.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub rules: Arc<StaticRules>,
    pub presentation: Presentation,
    pub typed_tx: Arc<TypedTxSettings>,
    pub registry: Arc<Registry>,
}

/// Build the runtime from `config`:
///
/// 1. Convert the chain section into rules
/// 2. Build the typed-data settings
/// 3. Register the stock actions and both auth schemes, then freeze the
///    registry
pub fn run_startup_sequence(config: &VmConfig) -> Result<Runtime, StartupError> {
    let rules = config.chain.to_rules()?;
    let typed_tx = Arc::new(config.typed_tx_settings()?);

    let mut registry = Registry::new();
    register_actions(&mut registry)?;
    register_auths(&mut registry, Arc::clone(&typed_tx))?;

    tracing::info!(
        chain_id = %rules.chain_id,
        action_types = registry.actions.len(),
        auth_types = registry.auths.len(),
        "runtime ready"
    );

    Ok(Runtime {
        rules: Arc::new(rules),
        presentation: config.presentation.to_presentation(),
        typed_tx,
        registry: registry.into_shared(),
    })
}

//! Actions shipped with vmauth.

pub mod transfer;

use std::sync::Arc;
use vmauth_chain::{Action, ChainError, Registry};
use vmauth_codec::Reader;

pub use transfer::{Transfer, TRANSFER_COMPUTE_UNITS, TRANSFER_ID, TRANSFER_SIZE};

/// Register decoders for every stock action.
pub fn register_actions(registry: &mut Registry) -> Result<(), ChainError> {
    registry.actions.register(TRANSFER_ID, |reader: &mut Reader<'_>| {
        Ok(Arc::new(Transfer::unmarshal(reader)?) as Arc<dyn Action>)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_actions_once() {
        let mut registry = Registry::new();
        register_actions(&mut registry).unwrap();
        assert!(registry.actions.supports(TRANSFER_ID));
        assert!(matches!(
            register_actions(&mut registry),
            Err(ChainError::DuplicateTypeId { .. })
        ));
    }
}

//! Chain addresses for secp256k1 keys.
//!
//! Both schemes derive the same 20-byte Ethereum address from a key and
//! embed it right-aligned in the 32-byte payload:
//!
//! ```text
//! type_id:1 | 0x00 * 12 | keccak256(X ‖ Y)[12..]:20
//! ```

use alloy_primitives::Address as EthAddress;
use secp256k1::PublicKey;
use vmauth_chain::ChainError;
use vmauth_codec::{Address, ADDRESS_PAYLOAD_LEN};

use crate::recovery::eth_address;

const ETH_ADDRESS_LEN: usize = 20;
const PADDING_LEN: usize = ADDRESS_PAYLOAD_LEN - ETH_ADDRESS_LEN;

/// Address of `public_key` under the scheme `type_id`.
pub fn derive_address(type_id: u8, public_key: &PublicKey) -> Address {
    from_eth_address(type_id, &eth_address(public_key))
}

pub fn from_eth_address(type_id: u8, eth: &EthAddress) -> Address {
    let mut payload = [0u8; ADDRESS_PAYLOAD_LEN];
    let (_, tail) = payload.split_at_mut(PADDING_LEN);
    tail.copy_from_slice(eth.as_slice());
    Address::new(type_id, payload)
}

/// Extract the Ethereum address from a `type_id` address.
pub fn to_eth_address(address: &Address, type_id: u8) -> Result<EthAddress, ChainError> {
    if address.type_id() != type_id {
        return Err(ChainError::InvalidAddress(format!(
            "expected address type {type_id}, got {}",
            address.type_id()
        )));
    }
    let (padding, eth) = address.payload().split_at(PADDING_LEN);
    if padding.iter().any(|b| *b != 0) {
        return Err(ChainError::InvalidAddress(
            "payload is not a padded ethereum address".into(),
        ));
    }
    Ok(EthAddress::from_slice(eth))
}

/// Parse a `0x`-prefixed hex Ethereum address.
pub fn eth_address_from_str(s: &str) -> Result<EthAddress, ChainError> {
    s.parse::<EthAddress>()
        .map_err(|e| ChainError::InvalidAddress(format!("{s}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::consts::{EIP712_ID, SECP256K1_ID};

    const ETH: &str = "0x96216849c49358B10257cb55b28eA603c874b05E";

    #[test]
    fn test_layout() {
        let eth = eth_address_from_str(ETH).unwrap();
        let address = from_eth_address(EIP712_ID, &eth);
        assert_eq!(
            hex::encode(address.as_bytes()),
            "04000000000000000000000000\
             96216849c49358b10257cb55b28ea603c874b05e"
        );
        assert_eq!(to_eth_address(&address, EIP712_ID).unwrap(), eth);
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let eth = eth_address_from_str(ETH).unwrap();
        let address = from_eth_address(SECP256K1_ID, &eth);
        assert!(matches!(
            to_eth_address(&address, EIP712_ID),
            Err(ChainError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_dirty_padding_rejected() {
        let mut payload = [0u8; ADDRESS_PAYLOAD_LEN];
        payload[0] = 1;
        let address = Address::new(EIP712_ID, payload);
        assert!(to_eth_address(&address, EIP712_ID).is_err());
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(eth_address_from_str("0x1234").is_err());
        assert!(eth_address_from_str("not an address").is_err());
    }
}

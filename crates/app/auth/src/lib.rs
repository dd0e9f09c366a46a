//! secp256k1 auth schemes for vmauth transactions.
//!
//! Two schemes share one key type and one address derivation:
//!
//! - [`Secp256k1Auth`] (type id 3) signs the raw transaction digest with the
//!   Ethereum `personal_sign` prefix.
//! - [`Eip712Auth`] (type id 4) signs an EIP-712 projection of a
//!   single-action transaction, so wallets can display what is being signed.
//!
//! Both store `v` as 27/28 and check that the key recovered from the
//! signature is the one carried in the payload.

pub mod address;
pub mod consts;
pub mod recovery;
pub mod scheme;
pub mod typed_tx;

use std::sync::Arc;
use vmauth_chain::{Auth, ChainError, Registry};
use vmauth_codec::Reader;

pub use address::{derive_address, eth_address_from_str, from_eth_address, to_eth_address};
pub use consts::{
    EIP712_COMPUTE_UNITS, EIP712_ID, EIP712_SIZE, MAX_SAFE_CHAIN_ID, SECP256K1_COMPUTE_UNITS,
    SECP256K1_ID, SECP256K1_SIZE, SIGNATURE_LEN,
};
pub use recovery::{
    personal_message_hash, recover_eth_address, recover_public_key, sign_hash_eth,
};
pub use scheme::{Eip712Auth, Eip712Factory, Secp256k1Auth, Secp256k1Factory};
pub use typed_tx::TypedTxSettings;

/// Register decoders for both auth schemes. EIP-712 auths decoded through
/// `registry` verify against `settings`.
pub fn register_auths(
    registry: &mut Registry,
    settings: Arc<TypedTxSettings>,
) -> Result<(), ChainError> {
    registry
        .auths
        .register(SECP256K1_ID, |reader: &mut Reader<'_>| {
            Ok(Arc::new(Secp256k1Auth::unmarshal(reader)?) as Arc<dyn Auth>)
        })?;
    registry
        .auths
        .register(EIP712_ID, move |reader: &mut Reader<'_>| {
            Ok(Arc::new(Eip712Auth::unmarshal(reader, Arc::clone(&settings))?) as Arc<dyn Auth>)
        })
}

//! Ethereum-style secp256k1 signing and public key recovery.

use alloy_primitives::{keccak256, Address as EthAddress, B256};
use k256::ecdsa::{signature::hazmat::PrehashSigner, RecoveryId as K256RecoveryId, Signature, SigningKey};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{All, Message, PublicKey, Secp256k1};
use std::sync::OnceLock;
use vmauth_chain::ChainError;

use crate::consts::SIGNATURE_LEN;

pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Offset added to the recovery id when it is stored in `v`.
const V_OFFSET: u8 = 27;

/// `keccak256("\x19Ethereum Signed Message:\n" ‖ len(message) ‖ message)`,
/// the hash `personal_sign` signs.
pub fn personal_message_hash(message: &[u8]) -> B256 {
    let len = message.len().to_string();
    let mut preimage =
        Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + len.len() + message.len());
    preimage.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    preimage.extend_from_slice(len.as_bytes());
    preimage.extend_from_slice(message);
    keccak256(preimage)
}

/// Sign a 32-byte hash, returning `r ‖ s ‖ v` with `v` in `{27, 28}`.
pub fn sign_hash_eth(key: &SigningKey, hash: &B256) -> Result<[u8; SIGNATURE_LEN], ChainError> {
    let (signature, recovery_id): (Signature, K256RecoveryId) = key
        .sign_prehash(hash.as_slice())
        .map_err(|e| ChainError::Signing(e.to_string()))?;

    let mut out = [0u8; SIGNATURE_LEN];
    let (compact, v) = out.split_at_mut(SIGNATURE_LEN - 1);
    compact.copy_from_slice(&signature.to_bytes());
    v.copy_from_slice(&[recovery_id.to_byte() + V_OFFSET]);
    Ok(out)
}

/// Recover the signer of `hash` and check the signature against it.
///
/// Only `v` values of 27 and 28 are accepted.
pub fn recover_public_key(
    hash: &B256,
    signature: &[u8; SIGNATURE_LEN],
) -> Result<PublicKey, ChainError> {
    let (compact, v) = signature.split_at(SIGNATURE_LEN - 1);
    let v = v.first().copied().ok_or(ChainError::InvalidSignature)?;
    let recovery_id = v
        .checked_sub(V_OFFSET)
        .and_then(|id| RecoveryId::from_i32(i32::from(id)).ok())
        .ok_or_else(|| ChainError::SignatureRecovery(format!("invalid recovery byte {v}")))?;
    let recoverable = RecoverableSignature::from_compact(compact, recovery_id)
        .map_err(|e| ChainError::SignatureRecovery(e.to_string()))?;

    let message = Message::from_digest_slice(hash.as_slice())
        .map_err(|e| ChainError::SignatureRecovery(e.to_string()))?;
    let public_key = secp()
        .recover_ecdsa(&message, &recoverable)
        .map_err(|e| ChainError::SignatureRecovery(e.to_string()))?;

    secp()
        .verify_ecdsa(&message, &recoverable.to_standard(), &public_key)
        .map_err(|_| ChainError::InvalidSignature)?;
    Ok(public_key)
}

/// Ethereum address of whoever signed `hash`.
pub fn recover_eth_address(
    hash: &B256,
    signature: &[u8; SIGNATURE_LEN],
) -> Result<EthAddress, ChainError> {
    recover_public_key(hash, signature).map(|key| eth_address(&key))
}

/// `keccak256(X ‖ Y)[12..]`
pub fn eth_address(public_key: &PublicKey) -> EthAddress {
    let uncompressed = public_key.serialize_uncompressed();
    let (_, xy) = uncompressed.split_at(1);
    let hash = keccak256(xy);
    let (_, address) = hash.as_slice().split_at(12);
    EthAddress::from_slice(address)
}

/// The verifying key of `key` in the representation recovery produces.
pub fn public_key_of(key: &SigningKey) -> Result<PublicKey, ChainError> {
    let point = key.verifying_key().to_encoded_point(false);
    PublicKey::from_slice(point.as_bytes()).map_err(|e| ChainError::InvalidPublicKey(e.to_string()))
}

/// Parse a serialized key, rejecting encodings that would not serialize
/// back to the same bytes.
pub fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, ChainError> {
    let key =
        PublicKey::from_slice(bytes).map_err(|e| ChainError::InvalidPublicKey(e.to_string()))?;
    let canonical = match bytes.len() {
        33 => key.serialize().as_slice() == bytes,
        _ => key.serialize_uncompressed().as_slice() == bytes,
    };
    if !canonical {
        return Err(ChainError::InvalidPublicKey("non-canonical encoding".into()));
    }
    Ok(key)
}

fn secp() -> &'static Secp256k1<All> {
    static SECP: OnceLock<Secp256k1<All>> = OnceLock::new();
    SECP.get_or_init(Secp256k1::new)
}

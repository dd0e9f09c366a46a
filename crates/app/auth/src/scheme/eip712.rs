//! Typed-data scheme: the signer sees the transaction as an EIP-712
//! `Transaction` struct instead of opaque digest bytes.

use ::secp256k1::PublicKey;
use alloy_primitives::B256;
use k256::ecdsa::SigningKey;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};
use vmauth_chain::{Auth, AuthFactory, ChainError, Rules, Transaction};
use vmauth_codec::{Address, Reader, Writer};

use crate::address::derive_address;
use crate::consts::{
    wire_size, COMPRESSED_PUBLIC_KEY_LEN, EIP712_COMPUTE_UNITS, EIP712_ID, EIP712_SIZE,
    SIGNATURE_LEN,
};
use crate::recovery::{parse_public_key, public_key_of, recover_public_key, sign_hash_eth};
use crate::typed_tx::TypedTxSettings;

/// `signer:33 (compressed) | signature:65`
///
/// Verification rebuilds the typed data from the transaction, so the auth
/// carries the settings it was decoded with.
#[derive(Clone, Debug)]
pub struct Eip712Auth {
    signer: PublicKey,
    signature: [u8; SIGNATURE_LEN],
    settings: Arc<TypedTxSettings>,
    address: OnceLock<Address>,
}

impl Eip712Auth {
    pub fn new(
        signer: PublicKey,
        signature: [u8; SIGNATURE_LEN],
        settings: Arc<TypedTxSettings>,
    ) -> Self {
        Self {
            signer,
            signature,
            settings,
            address: OnceLock::new(),
        }
    }

    pub fn unmarshal(
        reader: &mut Reader<'_>,
        settings: Arc<TypedTxSettings>,
    ) -> Result<Self, ChainError> {
        let signer = reader.unpack_fixed::<COMPRESSED_PUBLIC_KEY_LEN>();
        let signature = reader.unpack_fixed::<SIGNATURE_LEN>();
        reader.err()?;
        Ok(Self::new(parse_public_key(&signer)?, signature, settings))
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LEN] {
        &self.signature
    }

    /// The EIP-712 hash this auth signs for `tx`.
    pub fn signing_hash(&self, tx: &Transaction) -> Result<B256, ChainError> {
        Ok(self.settings.typed_data(tx)?.hash()?)
    }
}

impl PartialEq for Eip712Auth {
    fn eq(&self, other: &Self) -> bool {
        self.signer == other.signer && self.signature == other.signature
    }
}

impl Eq for Eip712Auth {}

impl Auth for Eip712Auth {
    fn type_id(&self) -> u8 {
        EIP712_ID
    }

    fn compute_units(&self, _rules: &dyn Rules) -> u64 {
        EIP712_COMPUTE_UNITS
    }

    fn verify(&self, tx: &Transaction) -> Result<(), ChainError> {
        let hash = self.signing_hash(tx)?;
        let recovered = recover_public_key(&hash, &self.signature)?;
        if recovered != self.signer {
            return Err(ChainError::SignerMismatch);
        }
        Ok(())
    }

    fn actor(&self) -> Address {
        *self
            .address
            .get_or_init(|| derive_address(EIP712_ID, &self.signer))
    }

    fn sponsor(&self) -> Address {
        self.actor()
    }

    fn size(&self) -> usize {
        EIP712_SIZE
    }

    fn marshal(&self, writer: &mut Writer) {
        writer.pack_fixed_bytes(&self.signer.serialize());
        writer.pack_fixed_bytes(&self.signature);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Signs the typed-data projection of single-action transactions.
pub struct Eip712Factory {
    key: SigningKey,
    public_key: PublicKey,
    settings: Arc<TypedTxSettings>,
}

impl Eip712Factory {
    pub fn new(key: SigningKey, settings: Arc<TypedTxSettings>) -> Result<Self, ChainError> {
        let public_key = public_key_of(&key)?;
        Ok(Self {
            key,
            public_key,
            settings,
        })
    }

    pub fn from_slice(secret: &[u8], settings: Arc<TypedTxSettings>) -> Result<Self, ChainError> {
        let key = SigningKey::from_slice(secret).map_err(|e| ChainError::Signing(e.to_string()))?;
        Self::new(key, settings)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn address(&self) -> Address {
        derive_address(EIP712_ID, &self.public_key)
    }
}

impl fmt::Debug for Eip712Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Eip712Factory")
            .field("address", &self.address())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl AuthFactory for Eip712Factory {
    fn sign(&self, tx: &Transaction) -> Result<Box<dyn Auth>, ChainError> {
        let hash = self.settings.typed_data(tx)?.hash()?;
        let signature = sign_hash_eth(&self.key, &hash)?;
        let auth = Eip712Auth::new(self.public_key, signature, Arc::clone(&self.settings));
        tracing::debug!(
            auth_type = EIP712_ID,
            actor = ?auth.actor(),
            typed_hash = %hash,
            "signed typed transaction"
        );
        Ok(Box::new(auth))
    }

    fn max_units(&self) -> (usize, u64) {
        (wire_size(EIP712_SIZE), EIP712_COMPUTE_UNITS)
    }
}

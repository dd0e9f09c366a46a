//! Raw-digest scheme: `personal_sign` over the transaction digest.

use ::secp256k1::PublicKey;
use k256::ecdsa::SigningKey;
use std::any::Any;
use std::fmt;
use std::sync::OnceLock;
use vmauth_chain::{Auth, AuthFactory, ChainError, Rules, Transaction};
use vmauth_codec::{Address, Reader, Writer};

use crate::address::derive_address;
use crate::consts::{
    wire_size, SECP256K1_COMPUTE_UNITS, SECP256K1_ID, SECP256K1_SIZE, SIGNATURE_LEN,
    UNCOMPRESSED_PUBLIC_KEY_LEN,
};
use crate::recovery::{
    parse_public_key, personal_message_hash, public_key_of, recover_public_key, sign_hash_eth,
};

/// `signer:65 (uncompressed) | signature:65`
#[derive(Clone, Debug)]
pub struct Secp256k1Auth {
    signer: PublicKey,
    signature: [u8; SIGNATURE_LEN],
    address: OnceLock<Address>,
}

impl Secp256k1Auth {
    pub fn new(signer: PublicKey, signature: [u8; SIGNATURE_LEN]) -> Self {
        Self {
            signer,
            signature,
            address: OnceLock::new(),
        }
    }

    pub fn unmarshal(reader: &mut Reader<'_>) -> Result<Self, ChainError> {
        let signer = reader.unpack_fixed::<UNCOMPRESSED_PUBLIC_KEY_LEN>();
        let signature = reader.unpack_fixed::<SIGNATURE_LEN>();
        reader.err()?;
        Ok(Self::new(parse_public_key(&signer)?, signature))
    }

    pub fn signer(&self) -> &PublicKey {
        &self.signer
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_LEN] {
        &self.signature
    }
}

impl PartialEq for Secp256k1Auth {
    fn eq(&self, other: &Self) -> bool {
        self.signer == other.signer && self.signature == other.signature
    }
}

impl Eq for Secp256k1Auth {}

impl Auth for Secp256k1Auth {
    fn type_id(&self) -> u8 {
        SECP256K1_ID
    }

    fn compute_units(&self, _rules: &dyn Rules) -> u64 {
        SECP256K1_COMPUTE_UNITS
    }

    fn verify(&self, tx: &Transaction) -> Result<(), ChainError> {
        let hash = personal_message_hash(&tx.digest()?);
        let recovered = recover_public_key(&hash, &self.signature)?;
        if recovered != self.signer {
            return Err(ChainError::SignerMismatch);
        }
        Ok(())
    }

    fn actor(&self) -> Address {
        *self
            .address
            .get_or_init(|| derive_address(SECP256K1_ID, &self.signer))
    }

    fn sponsor(&self) -> Address {
        self.actor()
    }

    fn size(&self) -> usize {
        SECP256K1_SIZE
    }

    fn marshal(&self, writer: &mut Writer) {
        writer.pack_fixed_bytes(&self.signer.serialize_uncompressed());
        writer.pack_fixed_bytes(&self.signature);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Signs transaction digests with a secp256k1 key.
pub struct Secp256k1Factory {
    key: SigningKey,
    public_key: PublicKey,
}

impl Secp256k1Factory {
    pub fn new(key: SigningKey) -> Result<Self, ChainError> {
        let public_key = public_key_of(&key)?;
        Ok(Self { key, public_key })
    }

    /// Build from a 32-byte private scalar.
    pub fn from_slice(secret: &[u8]) -> Result<Self, ChainError> {
        let key = SigningKey::from_slice(secret).map_err(|e| ChainError::Signing(e.to_string()))?;
        Self::new(key)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn address(&self) -> Address {
        derive_address(SECP256K1_ID, &self.public_key)
    }
}

impl fmt::Debug for Secp256k1Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Factory")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl AuthFactory for Secp256k1Factory {
    fn sign(&self, tx: &Transaction) -> Result<Box<dyn Auth>, ChainError> {
        let hash = personal_message_hash(&tx.digest()?);
        let signature = sign_hash_eth(&self.key, &hash)?;
        let auth = Secp256k1Auth::new(self.public_key, signature);
        tracing::debug!(
            auth_type = SECP256K1_ID,
            actor = ?auth.actor(),
            "signed transaction digest"
        );
        Ok(Box::new(auth))
    }

    fn max_units(&self) -> (usize, u64) {
        (wire_size(SECP256K1_SIZE), SECP256K1_COMPUTE_UNITS)
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY: &str = "fad9c8855b740a0b7ed4c221dbad0f33a83a49cad6b3fe8d5817ac83d38b6a19";

    fn factory() -> Secp256k1Factory {
        Secp256k1Factory::from_slice(&hex::decode(KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_payload_round_trip() {
        let factory = factory();
        let auth = Secp256k1Auth::new(*factory.public_key(), [7u8; SIGNATURE_LEN]);

        let mut writer = Writer::new(SECP256K1_SIZE, SECP256K1_SIZE);
        auth.marshal(&mut writer);
        let bytes = writer.into_bytes().unwrap();
        assert_eq!(bytes.len(), SECP256K1_SIZE);
        assert_eq!(bytes[0], 0x04);

        let decoded = Secp256k1Auth::unmarshal(&mut Reader::new(&bytes)).unwrap();
        assert_eq!(decoded, auth);
    }

    #[test]
    fn test_unmarshal_rejects_compressed_key() {
        let factory = factory();
        let mut bytes = factory.public_key().serialize().to_vec();
        bytes.resize(SECP256K1_SIZE, 0);
        assert!(matches!(
            Secp256k1Auth::unmarshal(&mut Reader::new(&bytes)),
            Err(ChainError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn test_actor_is_memoised_ethereum_address() {
        let factory = factory();
        let auth = Secp256k1Auth::new(*factory.public_key(), [0u8; SIGNATURE_LEN]);
        assert_eq!(
            hex::encode(auth.actor().as_bytes()),
            "03000000000000000000000000\
             96216849c49358b10257cb55b28ea603c874b05e"
        );
        assert_eq!(auth.actor(), auth.sponsor());
        assert_eq!(auth.actor(), factory.address());
    }

    #[test]
    fn test_max_units() {
        assert_eq!(factory().max_units(), (131, 10));
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", factory());
        assert!(!rendered.contains(KEY));
    }
}

//! Account addresses: one scheme byte followed by a 32-byte payload.

use bech32::{FromBase32, ToBase32, Variant};
use std::fmt;

use crate::error::CodecError;

pub const ADDRESS_LEN: usize = 33;
pub const ADDRESS_PAYLOAD_LEN: usize = ADDRESS_LEN - 1;

/// A fixed-width account address.
///
/// Byte 0 is the type id of the auth scheme (or action) that owns the
/// address; the rest is a scheme-specific public-key digest.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const EMPTY: Address = Address([0u8; ADDRESS_LEN]);

    pub fn new(type_id: u8, payload: [u8; ADDRESS_PAYLOAD_LEN]) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = type_id;
        bytes[1..].copy_from_slice(&payload);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| CodecError::InvalidLength {
            expected: ADDRESS_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    pub fn type_id(&self) -> u8 {
        self.0[0]
    }

    pub fn payload(&self) -> &[u8] {
        &self.0[1..]
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn to_bech32(&self, hrp: &str) -> Result<String, CodecError> {
        bech32::encode(hrp, self.0.to_base32(), Variant::Bech32)
            .map_err(|e| CodecError::InvalidBech32(e.to_string()))
    }

    /// Parse a bech32 address, requiring the given human-readable prefix.
    pub fn parse_bech32(hrp: &str, s: &str) -> Result<Self, CodecError> {
        let (decoded_hrp, data, variant) =
            bech32::decode(s).map_err(|e| CodecError::InvalidBech32(e.to_string()))?;
        if decoded_hrp != hrp {
            return Err(CodecError::InvalidBech32(format!(
                "expected prefix '{hrp}', got '{decoded_hrp}'"
            )));
        }
        if variant != Variant::Bech32 {
            return Err(CodecError::InvalidBech32("bech32m is not supported".to_string()));
        }
        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| CodecError::InvalidBech32(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const HRP: &str = "morpheus";

    #[test]
    fn test_parse_known_address() {
        let addr = Address::parse_bech32(
            HRP,
            "morpheus1qrzvk4zlwj9zsacqgtufx7zvapd3quufqpxk5rsdd4633m4wz2fdjk97rwu",
        )
        .unwrap();
        assert_eq!(
            hex::encode(addr.as_bytes()),
            "00c4cb545f748a28770042f893784ce85b107389004d6a0e0d6d7518eeae1292d9"
        );
        assert_eq!(addr.type_id(), 0);
    }

    #[test]
    fn test_bech32_round_trip() {
        let mut payload = [0u8; ADDRESS_PAYLOAD_LEN];
        for (i, b) in payload.iter_mut().enumerate().take(15) {
            *b = i as u8 + 2;
        }
        let addr = Address::new(1, payload);
        let text = addr.to_bech32(HRP).unwrap();
        assert_eq!(
            text,
            "morpheus1qypqxpq9qcrsszg2pvxq6rs0zqqqqqqqqqqqqqqqqqqqqqqqqqqqql22w7h"
        );
        assert_eq!(Address::parse_bech32(HRP, &text).unwrap(), addr);
    }

    #[test]
    fn test_wrong_hrp_rejected() {
        let text = Address::EMPTY.to_bech32("other").unwrap();
        assert!(matches!(
            Address::parse_bech32(HRP, &text),
            Err(CodecError::InvalidBech32(_))
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = bech32::encode(HRP, [1u8; 20].to_base32(), Variant::Bech32).unwrap();
        assert_eq!(
            Address::parse_bech32(HRP, &short).unwrap_err(),
            CodecError::InvalidLength {
                expected: ADDRESS_LEN,
                actual: 20
            }
        );
    }

    #[test]
    fn test_debug_is_hex() {
        let addr = Address::new(4, [0u8; ADDRESS_PAYLOAD_LEN]);
        assert!(format!("{addr:?}").starts_with("Address(0x0400"));
    }
}

//! 32-byte identifiers with a CB58 text form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

pub const ID_LEN: usize = 32;

const CHECKSUM_LEN: usize = 4;

/// Opaque 32-byte identifier (chain ids, transaction ids).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id([u8; ID_LEN]);

impl Id {
    pub const EMPTY: Id = Id([0u8; ID_LEN]);

    pub const fn new(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let arr: [u8; ID_LEN] = bytes.try_into().map_err(|_| CodecError::InvalidLength {
            expected: ID_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// SHA-256 of `data`.
    pub fn digest(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// base58(bytes ‖ sha256(bytes)[28..32])
    pub fn to_cb58(&self) -> String {
        let checksum = Sha256::digest(self.0);
        let mut payload = Vec::with_capacity(ID_LEN + CHECKSUM_LEN);
        payload.extend_from_slice(&self.0);
        payload.extend_from_slice(&checksum[ID_LEN - CHECKSUM_LEN..]);
        bs58::encode(payload).into_string()
    }

    pub fn from_cb58(s: &str) -> Result<Self, CodecError> {
        let raw = bs58::decode(s)
            .into_vec()
            .map_err(|e| CodecError::InvalidCb58(e.to_string()))?;
        if raw.len() != ID_LEN + CHECKSUM_LEN {
            return Err(CodecError::InvalidCb58(format!(
                "decoded {} bytes, expected {}",
                raw.len(),
                ID_LEN + CHECKSUM_LEN
            )));
        }
        let (body, checksum) = raw.split_at(ID_LEN);
        let expected = Sha256::digest(body);
        if expected.get(ID_LEN - CHECKSUM_LEN..) != Some(checksum) {
            return Err(CodecError::InvalidCb58("checksum mismatch".to_string()));
        }
        Self::from_slice(body)
    }
}

impl From<[u8; ID_LEN]> for Id {
    fn from(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Id {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cb58())
    }
}

impl FromStr for Id {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_cb58(s)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_cb58())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_cb58(&s).map_err(serde::de::Error::custom)
    }
}

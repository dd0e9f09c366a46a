use vmauth_codec::BYTE_LEN;

pub const SECP256K1_ID: u8 = 3;
pub const EIP712_ID: u8 = 4;

pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;
/// `r:32 | s:32 | v:1`, with `v` in `{27, 28}`.
pub const SIGNATURE_LEN: usize = 65;

pub const SECP256K1_SIZE: usize = UNCOMPRESSED_PUBLIC_KEY_LEN + SIGNATURE_LEN;
pub const EIP712_SIZE: usize = COMPRESSED_PUBLIC_KEY_LEN + SIGNATURE_LEN;

pub const SECP256K1_COMPUTE_UNITS: u64 = 10;
pub const EIP712_COMPUTE_UNITS: u64 = 10;

/// Largest chain id wallets accept in an EIP-712 domain.
pub const MAX_SAFE_CHAIN_ID: u64 = 4_503_599_627_370_476;

pub const DEFAULT_DOMAIN_NAME: &str = "HyperSDK";
pub const DEFAULT_DOMAIN_VERSION: &str = "1";

/// Size of a serialized auth including its type id.
pub const fn wire_size(payload: usize) -> usize {
    BYTE_LEN + payload
}

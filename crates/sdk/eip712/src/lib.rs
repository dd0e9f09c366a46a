//! EIP-712 typed structured data hashing.
//!
//! Implements the "v4" flavour used by wallets: struct references, nested
//! arrays of structs and fixed-size arrays are all supported. Values are
//! supplied as JSON (`serde_json::Value`) so arbitrary schemas can be hashed
//! without generated bindings.
//!
//! ```text
//! digest = keccak256(0x19 0x01 ‖ hash_struct(EIP712Domain, domain) ‖ hash_struct(primary, message))
//! ```

pub mod encoder;
pub mod error;
pub mod types;

pub use encoder::{
    encode_data, encode_type, hash_struct, type_hash, typed_data_and_hash, PREIMAGE_LEN,
    SIGNING_PREFIX,
};
pub use error::TypedDataError;
pub use types::{Type, TypedData, TypedDataDomain, Types, EIP712_DOMAIN};

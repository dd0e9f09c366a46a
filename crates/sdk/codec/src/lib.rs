//! Binary and text encodings shared across the vmauth crates.
//!
//! - [`Writer`] / [`Reader`]: fixed-width, big-endian packing with a
//!   latched error
//! - [`Id`]: 32-byte identifier, CB58 text form
//! - [`Address`]: scheme byte plus 32-byte payload, bech32 text form
//! - [`format_balance`] / [`parse_balance`]: fixed-point amounts

pub mod address;
pub mod error;
pub mod id;
pub mod packer;
pub mod presentation;
pub mod units;

pub use address::{Address, ADDRESS_LEN, ADDRESS_PAYLOAD_LEN};
pub use error::CodecError;
pub use id::{Id, ID_LEN};
pub use packer::{Reader, Writer};
pub use presentation::Presentation;
pub use units::{format_balance, parse_balance};

/// Size in bytes of a packed `u64`/`i64`.
pub const U64_LEN: usize = 8;
/// Size in bytes of a packed byte or bool.
pub const BYTE_LEN: usize = 1;

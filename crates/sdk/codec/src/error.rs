//! Codec error types.

use thiserror::Error;

/// Errors produced while packing, unpacking or parsing encoded values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A write would grow the buffer past the writer's limit.
    #[error("write exceeds limit: {requested} bytes requested, limit is {limit}")]
    CapacityExceeded { limit: usize, requested: usize },

    /// A read needed more bytes than the buffer has left.
    #[error("insufficient bytes: needed {needed}, {remaining} remaining")]
    InsufficientBytes { needed: usize, remaining: usize },

    /// Bytes were left over after a complete decode.
    #[error("{0} trailing bytes after decode")]
    TrailingBytes(usize),

    /// A boolean byte was neither 0 nor 1.
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// A slice had the wrong length for a fixed-size value.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// CB58 text could not be decoded or its checksum did not match.
    #[error("invalid cb58 string: {0}")]
    InvalidCb58(String),

    /// Bech32 text could not be decoded or used the wrong HRP.
    #[error("invalid bech32 address: {0}")]
    InvalidBech32(String),

    /// A fixed-point balance string could not be parsed.
    #[error("invalid balance '{0}'")]
    InvalidBalance(String),
}

impl CodecError {
    /// Returns true when the error came from a bounded writer running out of room.
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, CodecError::CapacityExceeded { .. })
    }
}

//! Transaction and auth error types.

use thiserror::Error;
use vmauth_codec::CodecError;
use vmauth_eip712::TypedDataError;

/// Coarse classification used by callers that only need to know who is at
/// fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad bytes or a structurally invalid transaction.
    MalformedInput,
    /// Signature recovery or verification failed.
    SignatureInvalid,
    /// Programming or configuration mistake (schemas, registry set-up, keys).
    Configuration,
    /// A bounded writer ran out of room.
    CapacityExceeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    TypedData(#[from] TypedDataError),

    #[error("unknown {family} type id {type_id}")]
    UnknownTypeId { family: &'static str, type_id: u8 },

    #[error("{family} type id {type_id} is already registered")]
    DuplicateTypeId { family: &'static str, type_id: u8 },

    #[error("too many actions: {count} exceeds limit of {max}")]
    TooManyActions { count: usize, max: usize },

    #[error("auth requires exactly one action, got {0}")]
    UnsupportedActionCount(usize),

    #[error("transaction size {size} exceeds limit of {max}")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("transaction is not signed")]
    MissingAuth,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("failed to recover signer from signature: {0}")]
    SignatureRecovery(String),

    #[error("recovered key does not match the stored signer")]
    SignerMismatch,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("chain id mismatch")]
    ChainIdMismatch,

    #[error("timestamp {0} is not a whole second")]
    MisalignedTimestamp(i64),

    #[error("transaction expired: timestamp {timestamp} is before {now}")]
    Expired { timestamp: i64, now: i64 },

    #[error("timestamp {timestamp} is beyond the validity window ending {max}")]
    TimestampTooFar { timestamp: i64, max: i64 },

    #[error("{what} type {type_id} is not active at {timestamp}")]
    NotActive {
        what: &'static str,
        type_id: u8,
        timestamp: i64,
    },
}

impl ChainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::Codec(err) if err.is_capacity_exceeded() => ErrorKind::CapacityExceeded,
            ChainError::TransactionTooLarge { .. } => ErrorKind::CapacityExceeded,

            ChainError::InvalidSignature
            | ChainError::SignatureRecovery(_)
            | ChainError::SignerMismatch => ErrorKind::SignatureInvalid,

            ChainError::TypedData(_)
            | ChainError::DuplicateTypeId { .. }
            | ChainError::Signing(_) => ErrorKind::Configuration,

            ChainError::Codec(_)
            | ChainError::UnknownTypeId { .. }
            | ChainError::TooManyActions { .. }
            | ChainError::UnsupportedActionCount(_)
            | ChainError::MissingAuth
            | ChainError::InvalidPublicKey(_)
            | ChainError::InvalidAddress(_)
            | ChainError::InvalidField(_)
            | ChainError::ChainIdMismatch
            | ChainError::MisalignedTimestamp(_)
            | ChainError::Expired { .. }
            | ChainError::TimestampTooFar { .. }
            | ChainError::NotActive { .. } => ErrorKind::MalformedInput,
        }
    }
}

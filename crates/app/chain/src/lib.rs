//! Transaction model and authentication abstraction.
//!
//! A [`Transaction`] is a [`Base`], an ordered list of [`Action`]s and an
//! optional [`Auth`]. The auth signs the transaction's digest (or a
//! projection of it) and is decoded back through a [`Registry`] keyed by
//! 1-byte type ids.

pub mod action;
pub mod auth;
pub mod base;
pub mod error;
pub mod registry;
pub mod rules;
pub mod transaction;
pub mod verify;

pub use action::{Action, TypedField};
pub use auth::{Auth, AuthFactory};
pub use base::{Base, BASE_SIZE};
pub use error::{ChainError, ErrorKind};
pub use registry::{Registry, TypeParser, UnmarshalFn};
pub use rules::{Rules, StaticRules, ValidRange};
pub use transaction::{Transaction, MAX_ACTIONS};
pub use verify::{filter_verified, verify_batch, VerificationResult};

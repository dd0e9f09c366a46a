use std::any::Any;
use std::fmt::Debug;
use vmauth_codec::{Address, Writer};

use crate::error::ChainError;
use crate::rules::{Rules, ValidRange};
use crate::transaction::Transaction;

/// A credential attached to a transaction.
///
/// Implementations verify against the whole transaction, recomputing
/// whatever message their scheme signs (raw digest, typed-data hash, ...).
pub trait Auth: Send + Sync + Debug {
    fn type_id(&self) -> u8;

    fn compute_units(&self, rules: &dyn Rules) -> u64;

    fn valid_range(&self, _rules: &dyn Rules) -> ValidRange {
        ValidRange::ALWAYS
    }

    fn verify(&self, tx: &Transaction) -> Result<(), ChainError>;

    /// Account the transaction acts on behalf of.
    fn actor(&self) -> Address;

    /// Account that pays fees.
    fn sponsor(&self) -> Address;

    /// Encoded length in bytes, excluding the type id.
    fn size(&self) -> usize;

    fn marshal(&self, writer: &mut Writer);

    fn as_any(&self) -> &dyn Any;
}

/// Produces an [`Auth`] for a transaction. Holds the signing key.
pub trait AuthFactory: Send + Sync {
    fn sign(&self, tx: &Transaction) -> Result<Box<dyn Auth>, ChainError>;

    /// Upper bounds on `(size, compute_units)` of the produced auth.
    fn max_units(&self) -> (usize, u64);
}

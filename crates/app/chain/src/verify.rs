//! Parallel auth verification for batches of transactions.

use rayon::prelude::*;

use crate::error::ChainError;
use crate::transaction::Transaction;

/// Outcome of verifying one transaction in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Position of the transaction in the input slice.
    pub index: usize,
    pub result: Result<(), ChainError>,
}

/// Verify every transaction's auth across the rayon pool. Results come back
/// in input order.
pub fn verify_batch(txs: &[Transaction]) -> Vec<VerificationResult> {
    txs.par_iter()
        .enumerate()
        .map(|(index, tx)| VerificationResult {
            index,
            result: tx.verify_auth(),
        })
        .collect()
}

/// Keep the transactions whose result is `Ok`, along with their original
/// indices.
///
/// `results` must be the output of [`verify_batch`] over the same `txs`,
/// one entry per transaction in input order.
pub fn filter_verified(
    txs: Vec<Transaction>,
    results: &[VerificationResult],
) -> (Vec<Transaction>, Vec<usize>) {
    debug_assert_eq!(txs.len(), results.len(), "one result per transaction");
    let mut verified = Vec::with_capacity(txs.len());
    let mut indices = Vec::with_capacity(txs.len());

    for (tx, outcome) in txs.into_iter().zip(results) {
        if outcome.result.is_ok() {
            indices.push(outcome.index);
            verified.push(tx);
        }
    }

    let rejected = results.len() - indices.len();
    if rejected > 0 {
        tracing::debug!(rejected, accepted = indices.len(), "filtered batch");
    }
    (verified, indices)
}

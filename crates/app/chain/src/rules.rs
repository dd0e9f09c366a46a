//! Chain parameters consulted while validating and pricing transactions.

use vmauth_codec::Id;

pub const DEFAULT_VALIDITY_WINDOW_MS: i64 = 60_000;
pub const DEFAULT_MAX_ACTIONS_PER_TX: usize = 16;
pub const DEFAULT_BASE_COMPUTE_UNITS: u64 = 1;
pub const DEFAULT_MAX_TX_SIZE: usize = 2 * 1024 * 1024;

pub trait Rules: Send + Sync {
    fn chain_id(&self) -> Id;

    /// How far past "now" a transaction's expiry may be set.
    fn validity_window_ms(&self) -> i64;

    fn max_actions_per_tx(&self) -> usize;

    /// Flat compute charge applied to every transaction.
    fn base_compute_units(&self) -> u64;

    fn max_tx_size(&self) -> usize;
}

/// Window of timestamps during which an action or auth type is accepted.
/// `None` leaves that side unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl ValidRange {
    pub const ALWAYS: ValidRange = ValidRange {
        start: None,
        end: None,
    };

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start.map_or(true, |start| timestamp >= start)
            && self.end.map_or(true, |end| timestamp <= end)
    }
}

/// Fixed [`Rules`], typically built from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticRules {
    pub chain_id: Id,
    pub validity_window_ms: i64,
    pub max_actions_per_tx: usize,
    pub base_compute_units: u64,
    pub max_tx_size: usize,
}

impl StaticRules {
    pub fn new(chain_id: Id) -> Self {
        Self {
            chain_id,
            validity_window_ms: DEFAULT_VALIDITY_WINDOW_MS,
            max_actions_per_tx: DEFAULT_MAX_ACTIONS_PER_TX,
            base_compute_units: DEFAULT_BASE_COMPUTE_UNITS,
            max_tx_size: DEFAULT_MAX_TX_SIZE,
        }
    }
}

impl Rules for StaticRules {
    fn chain_id(&self) -> Id {
        self.chain_id
    }

    fn validity_window_ms(&self) -> i64 {
        self.validity_window_ms
    }

    fn max_actions_per_tx(&self) -> usize {
        self.max_actions_per_tx
    }

    fn base_compute_units(&self) -> u64 {
        self.base_compute_units
    }

    fn max_tx_size(&self) -> usize {
        self.max_tx_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range_bounds_are_inclusive() {
        let range = ValidRange {
            start: Some(10),
            end: Some(20),
        };
        assert!(!range.contains(9));
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(21));
        assert!(ValidRange::ALWAYS.contains(i64::MIN));
        assert!(ValidRange::ALWAYS.contains(i64::MAX));
    }
}

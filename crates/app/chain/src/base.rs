use vmauth_codec::{Id, Reader, Writer, ID_LEN, U64_LEN};

use crate::error::ChainError;
use crate::rules::Rules;

/// `timestamp:8 | chain_id:32 | max_fee:8`
pub const BASE_SIZE: usize = U64_LEN + ID_LEN + U64_LEN;

const MILLIS_PER_SECOND: i64 = 1_000;

/// Fields every transaction carries regardless of its actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Base {
    /// Expiry, in milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub chain_id: Id,
    pub max_fee: u64,
}

impl Base {
    pub fn marshal(&self, writer: &mut Writer) {
        writer.pack_i64(self.timestamp);
        writer.pack_id(&self.chain_id);
        writer.pack_u64(self.max_fee);
    }

    pub fn unmarshal(reader: &mut Reader<'_>) -> Result<Self, ChainError> {
        let base = Base {
            timestamp: reader.unpack_i64(),
            chain_id: reader.unpack_id(),
            max_fee: reader.unpack_u64(),
        };
        reader.err()?;
        Ok(base)
    }

    /// Checks the base against chain rules at wall-clock time `now_ms`.
    pub fn validate(&self, rules: &dyn Rules, now_ms: i64) -> Result<(), ChainError> {
        if self.timestamp % MILLIS_PER_SECOND != 0 {
            return Err(ChainError::MisalignedTimestamp(self.timestamp));
        }
        if self.timestamp < now_ms {
            return Err(ChainError::Expired {
                timestamp: self.timestamp,
                now: now_ms,
            });
        }
        let max = now_ms.saturating_add(rules.validity_window_ms());
        if self.timestamp > max {
            return Err(ChainError::TimestampTooFar {
                timestamp: self.timestamp,
                max,
            });
        }
        if self.chain_id != rules.chain_id() {
            return Err(ChainError::ChainIdMismatch);
        }
        Ok(())
    }
}

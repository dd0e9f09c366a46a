//! Human-readable rendering settings shared by actions and typed data.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::CodecError;
use crate::units::{format_balance, parse_balance};

pub const DEFAULT_HRP: &str = "morpheus";
pub const DEFAULT_DECIMALS: u8 = 9;

/// Address prefix and balance scaling used when values are shown to users.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub hrp: String,
    pub decimals: u8,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            hrp: DEFAULT_HRP.to_string(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl Presentation {
    pub fn format_address(&self, address: &Address) -> Result<String, CodecError> {
        address.to_bech32(&self.hrp)
    }

    pub fn parse_address(&self, s: &str) -> Result<Address, CodecError> {
        Address::parse_bech32(&self.hrp, s)
    }

    pub fn format_balance(&self, value: u64) -> String {
        format_balance(value, self.decimals)
    }

    pub fn parse_balance(&self, s: &str) -> Result<u64, CodecError> {
        parse_balance(s, self.decimals)
    }
}

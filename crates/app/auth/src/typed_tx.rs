//! Projection of a single-action transaction onto EIP-712 typed data.
//!
//! ```text
//! Transaction(string expiration,string maxFee,string action,Params params)
//! Params(<one `string` field per action field>)
//! ```
//!
//! Every action field is typed `string` and carries the action's JSON
//! presentation value, so wallets render exactly what the JSON form shows.

use alloy_primitives::{Address as EthAddress, U256};
use chrono::{DateTime, SecondsFormat};
use serde_json::{Map, Value};
use vmauth_chain::{ChainError, Transaction};
use vmauth_codec::{Id, Presentation};
use vmauth_eip712::{Type, TypedData, TypedDataDomain, Types, EIP712_DOMAIN};

use crate::consts::{DEFAULT_DOMAIN_NAME, DEFAULT_DOMAIN_VERSION, MAX_SAFE_CHAIN_ID};

pub const PRIMARY_TYPE: &str = "Transaction";
pub const PARAMS_TYPE: &str = "Params";

/// Network-wide inputs to the typed-data projection. Signer and verifier
/// must agree on every field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedTxSettings {
    pub presentation: Presentation,
    pub domain_name: String,
    pub domain_version: String,
    pub verifying_contract: EthAddress,
    /// Chain ids are reduced modulo this bound. Zero disables the reduction.
    pub max_safe_chain_id: u64,
}

impl Default for TypedTxSettings {
    fn default() -> Self {
        Self {
            presentation: Presentation::default(),
            domain_name: DEFAULT_DOMAIN_NAME.to_string(),
            domain_version: DEFAULT_DOMAIN_VERSION.to_string(),
            verifying_contract: EthAddress::ZERO,
            max_safe_chain_id: MAX_SAFE_CHAIN_ID,
        }
    }
}

impl TypedTxSettings {
    /// The chain id as a big-endian integer, reduced for wallet compatibility.
    pub fn domain_chain_id(&self, chain_id: &Id) -> U256 {
        let chain_id = U256::from_be_bytes(*chain_id.as_bytes());
        if self.max_safe_chain_id == 0 {
            return chain_id;
        }
        chain_id % U256::from(self.max_safe_chain_id)
    }

    pub fn domain(&self, chain_id: &Id) -> TypedDataDomain {
        TypedDataDomain {
            name: Some(self.domain_name.clone()),
            version: Some(self.domain_version.clone()),
            chain_id: Some(self.domain_chain_id(chain_id)),
            verifying_contract: Some(self.verifying_contract),
            salt: None,
        }
    }

    /// Build the typed-data document a wallet signs for `tx`.
    ///
    /// Only transactions with exactly one action can be projected.
    pub fn typed_data(&self, tx: &Transaction) -> Result<TypedData, ChainError> {
        let [action] = tx.actions.as_slice() else {
            return Err(ChainError::UnsupportedActionCount(tx.actions.len()));
        };

        let domain = self.domain(&tx.base.chain_id);
        let params_fields = action
            .typed_fields()
            .iter()
            .map(|field| Type::new(field.name, field.kind))
            .collect();

        let mut types = Types::new();
        types.insert(EIP712_DOMAIN.to_string(), domain.types());
        types.insert(
            PRIMARY_TYPE.to_string(),
            vec![
                Type::new("expiration", "string"),
                Type::new("maxFee", "string"),
                Type::new("action", "string"),
                Type::new("params", PARAMS_TYPE),
            ],
        );
        types.insert(PARAMS_TYPE.to_string(), params_fields);

        let mut message = Map::new();
        message.insert(
            "expiration".into(),
            Value::String(expiration(tx.base.timestamp)?),
        );
        message.insert(
            "maxFee".into(),
            Value::String(self.presentation.format_balance(tx.base.max_fee)),
        );
        message.insert("action".into(), Value::String(action.name().to_string()));
        message.insert(
            "params".into(),
            Value::Object(action.to_json(&self.presentation)?),
        );

        Ok(TypedData {
            types,
            primary_type: PRIMARY_TYPE.to_string(),
            domain,
            message,
        })
    }
}

/// RFC 3339 UTC rendering of a millisecond timestamp at second precision.
fn expiration(timestamp_ms: i64) -> Result<String, ChainError> {
    DateTime::from_timestamp(timestamp_ms.div_euclid(1000), 0)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .ok_or_else(|| ChainError::InvalidField(format!("timestamp {timestamp_ms} out of range")))
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vmauth_actions::Transfer;
    use vmauth_chain::{Action, Base};
    use vmauth_eip712::encode_type;

    const CHAIN_ID: &str = "2c7iUW3kCDwRA9ZFd5bjZZc8iDy68uAsFSBahjqSZGttiTDSNH";

    fn transfer() -> Arc<dyn Action> {
        let to = Presentation::default()
            .parse_address("morpheus1qrzvk4zlwj9zsacqgtufx7zvapd3quufqpxk5rsdd4633m4wz2fdjk97rwu")
            .unwrap();
        Arc::new(Transfer {
            to,
            value: 123_000_000_000,
        })
    }

    fn base() -> Base {
        Base {
            timestamp: 1_717_111_222_000,
            chain_id: CHAIN_ID.parse().unwrap(),
            max_fee: 10_000_000_000,
        }
    }

    #[test]
    fn test_expiration_format() {
        assert_eq!(expiration(1_717_111_222_000).unwrap(), "2024-05-30T23:20:22Z");
        assert_eq!(expiration(0).unwrap(), "1970-01-01T00:00:00Z");
        assert!(expiration(i64::MAX).is_err());
    }

    #[test]
    fn test_chain_id_reduction() {
        let settings = TypedTxSettings::default();
        let id: Id = CHAIN_ID.parse().unwrap();
        let reduced = settings.domain_chain_id(&id);
        assert!(reduced < U256::from(MAX_SAFE_CHAIN_ID));

        let unreduced = TypedTxSettings {
            max_safe_chain_id: 0,
            ..TypedTxSettings::default()
        };
        assert_eq!(
            unreduced.domain_chain_id(&id),
            U256::from_be_bytes(*id.as_bytes())
        );
    }

    #[test]
    fn test_typed_data_shape() {
        let tx = Transaction::new(base(), vec![transfer()]);
        let typed = TypedTxSettings::default().typed_data(&tx).unwrap();

        assert_eq!(
            encode_type(&typed.types, PRIMARY_TYPE).unwrap(),
            "Transaction(string expiration,string maxFee,string action,Params params)\
             Params(string to,string value)"
        );
        assert_eq!(typed.message["expiration"], "2024-05-30T23:20:22Z");
        assert_eq!(typed.message["maxFee"], "10.000000000");
        assert_eq!(typed.message["action"], "Transfer");
        assert_eq!(typed.message["params"]["value"], "123.000000000");
        assert_eq!(
            hex::encode(typed.hash().unwrap()),
            "b13980ad8fbcf826b78eaa9e659ad648a5db970b7b3db6b3a7b000c0c0b51c75"
        );
    }

    #[test]
    fn test_requires_exactly_one_action() {
        let settings = TypedTxSettings::default();
        let empty = Transaction::new(base(), vec![]);
        assert_eq!(
            settings.typed_data(&empty).unwrap_err(),
            ChainError::UnsupportedActionCount(0)
        );
        let double = Transaction::new(base(), vec![transfer(), transfer()]);
        assert_eq!(
            settings.typed_data(&double).unwrap_err(),
            ChainError::UnsupportedActionCount(2)
        );
    }

    #[test]
    fn test_domain_settings_change_hash() {
        let tx = Transaction::new(base(), vec![transfer()]);
        let default_hash = TypedTxSettings::default().typed_data(&tx).unwrap().hash().unwrap();
        let renamed = TypedTxSettings {
            domain_name: "OtherVM".into(),
            ..TypedTxSettings::default()
        };
        assert_ne!(renamed.typed_data(&tx).unwrap().hash().unwrap(), default_hash);
    }
}

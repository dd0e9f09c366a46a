use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const EIP712_DOMAIN: &str = "EIP712Domain";

/// One named, typed field of a struct type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
}

impl Type {
    pub fn new(name: impl Into<String>, r#type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            r#type: r#type.into(),
        }
    }
}

/// Struct name to ordered field list.
pub type Types = BTreeMap<String, Vec<Type>>;

/// The `EIP712Domain` value. Absent fields are left out of both the domain
/// type and its encoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedDataDomain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<U256>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifying_contract: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<B256>,
}

impl TypedDataDomain {
    /// Field list of `EIP712Domain` for the fields that are set, in canonical
    /// order.
    pub fn types(&self) -> Vec<Type> {
        let mut fields = Vec::with_capacity(5);
        if self.name.is_some() {
            fields.push(Type::new("name", "string"));
        }
        if self.version.is_some() {
            fields.push(Type::new("version", "string"));
        }
        if self.chain_id.is_some() {
            fields.push(Type::new("chainId", "uint256"));
        }
        if self.verifying_contract.is_some() {
            fields.push(Type::new("verifyingContract", "address"));
        }
        if self.salt.is_some() {
            fields.push(Type::new("salt", "bytes32"));
        }
        fields
    }

    /// The domain as a message value for [`crate::hash_struct`].
    pub fn to_message(&self) -> Map<String, Value> {
        let mut message = Map::new();
        if let Some(name) = &self.name {
            message.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(version) = &self.version {
            message.insert("version".into(), Value::String(version.clone()));
        }
        if let Some(chain_id) = &self.chain_id {
            message.insert("chainId".into(), Value::String(chain_id.to_string()));
        }
        if let Some(contract) = &self.verifying_contract {
            message.insert(
                "verifyingContract".into(),
                Value::String(format!("0x{}", hex::encode(contract.as_slice()))),
            );
        }
        if let Some(salt) = &self.salt {
            message.insert(
                "salt".into(),
                Value::String(format!("0x{}", hex::encode(salt.as_slice()))),
            );
        }
        message
    }
}

/// A complete typed-data document: schema, domain and message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub types: Types,
    pub primary_type: String,
    pub domain: TypedDataDomain,
    pub message: Map<String, Value>,
}

use serde_json::{Map, Value};
use std::any::Any;
use std::fmt::Debug;
use vmauth_codec::{Presentation, Writer};

use crate::error::ChainError;
use crate::rules::{Rules, ValidRange};

/// A field in an action's typed-data projection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypedField {
    pub name: &'static str,
    /// EIP-712 type string.
    pub kind: &'static str,
}

impl TypedField {
    /// A field rendered as its presentation string.
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: "string",
        }
    }
}

/// An operation carried by a transaction.
///
/// The core never interprets actions. It only needs their discriminant,
/// their exact wire form and a human-readable projection for typed-data
/// signing.
pub trait Action: Send + Sync + Debug {
    fn type_id(&self) -> u8;

    /// Name shown to signers, e.g. `"Transfer"`.
    fn name(&self) -> &'static str;

    fn compute_units(&self, rules: &dyn Rules) -> u64;

    fn valid_range(&self, _rules: &dyn Rules) -> ValidRange {
        ValidRange::ALWAYS
    }

    /// Encoded length in bytes, excluding the type id.
    fn size(&self) -> usize;

    fn marshal(&self, writer: &mut Writer);

    /// JSON projection, keyed by the names in [`Action::typed_fields`].
    fn to_json(&self, presentation: &Presentation) -> Result<Map<String, Value>, ChainError>;

    /// Declared field list for typed-data signing, in JSON key order.
    fn typed_fields(&self) -> &'static [TypedField];

    fn as_any(&self) -> &dyn Any;
}

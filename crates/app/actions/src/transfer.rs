use serde_json::{Map, Value};
use std::any::Any;
use vmauth_chain::{Action, ChainError, Rules, TypedField};
use vmauth_codec::{Address, Presentation, Reader, Writer, ADDRESS_LEN, U64_LEN};

pub const TRANSFER_ID: u8 = 0;
pub const TRANSFER_COMPUTE_UNITS: u64 = 1;
/// `to:33 | value:8`
pub const TRANSFER_SIZE: usize = ADDRESS_LEN + U64_LEN;

const FIELDS: &[TypedField] = &[TypedField::string("to"), TypedField::string("value")];

/// Moves `value` base units to `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub to: Address,
    pub value: u64,
}

impl Transfer {
    pub fn unmarshal(reader: &mut Reader<'_>) -> Result<Self, ChainError> {
        let transfer = Transfer {
            to: reader.unpack_address(),
            value: reader.unpack_u64(),
        };
        reader.err()?;
        Ok(transfer)
    }

    /// Inverse of [`Action::to_json`].
    pub fn from_json(json: &Map<String, Value>, presentation: &Presentation) -> Result<Self, ChainError> {
        let field = |name: &str| {
            json.get(name)
                .and_then(Value::as_str)
                .ok_or_else(|| ChainError::InvalidField(format!("missing string field '{name}'")))
        };
        Ok(Transfer {
            to: presentation.parse_address(field("to")?)?,
            value: presentation.parse_balance(field("value")?)?,
        })
    }
}

impl Action for Transfer {
    fn type_id(&self) -> u8 {
        TRANSFER_ID
    }

    fn name(&self) -> &'static str {
        "Transfer"
    }

    fn compute_units(&self, _rules: &dyn Rules) -> u64 {
        TRANSFER_COMPUTE_UNITS
    }

    fn size(&self) -> usize {
        TRANSFER_SIZE
    }

    fn marshal(&self, writer: &mut Writer) {
        writer.pack_address(&self.to);
        writer.pack_u64(self.value);
    }

    fn to_json(&self, presentation: &Presentation) -> Result<Map<String, Value>, ChainError> {
        let mut json = Map::new();
        json.insert(
            "to".into(),
            Value::String(presentation.format_address(&self.to)?),
        );
        json.insert(
            "value".into(),
            Value::String(presentation.format_balance(self.value)),
        );
        Ok(json)
    }

    fn typed_fields(&self) -> &'static [TypedField] {
        FIELDS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

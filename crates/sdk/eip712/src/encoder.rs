//! Type encoding and struct hashing (EIP-712 v4).

use alloy_primitives::{keccak256, Address, Sign, B256, I256, U256};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::TypedDataError;
use crate::types::{TypedData, Types, EIP712_DOMAIN};

pub const SIGNING_PREFIX: [u8; 2] = [0x19, 0x01];
pub const PREIMAGE_LEN: usize = 66;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Primitive {
    Address,
    Bool,
    String,
    Bytes,
    FixedBytes(usize),
    Uint(usize),
    Int(usize),
}

impl Primitive {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "address" => Some(Self::Address),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "bytes" => Some(Self::Bytes),
            "uint" => Some(Self::Uint(256)),
            "int" => Some(Self::Int(256)),
            _ => {
                if let Some(width) = name.strip_prefix("bytes") {
                    let width = parse_width(width)?;
                    return (1..=32).contains(&width).then_some(Self::FixedBytes(width));
                }
                if let Some(bits) = name.strip_prefix("uint") {
                    return int_bits(bits).map(Self::Uint);
                }
                if let Some(bits) = name.strip_prefix("int") {
                    return int_bits(bits).map(Self::Int);
                }
                None
            }
        }
    }
}

fn parse_width(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn int_bits(s: &str) -> Option<usize> {
    let bits = parse_width(s)?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits)
}

/// Strips one array suffix: `T[]` gives `(T, None)`, `T[n]` gives `(T, Some(n))`.
fn split_array(ty: &str) -> Result<Option<(&str, Option<usize>)>, TypedDataError> {
    let Some(body) = ty.strip_suffix(']') else {
        return Ok(None);
    };
    let open = body
        .rfind('[')
        .ok_or_else(|| TypedDataError::UnknownType(ty.to_string()))?;
    let (inner, len) = body.split_at(open);
    let len = len.trim_start_matches('[');
    if len.is_empty() {
        return Ok(Some((inner, None)));
    }
    let len = parse_width(len).ok_or_else(|| TypedDataError::UnknownType(ty.to_string()))?;
    Ok(Some((inner, Some(len))))
}

fn base_type(ty: &str) -> &str {
    ty.split('[').next().unwrap_or(ty)
}

fn collect_dependencies<'a>(
    types: &'a Types,
    name: &str,
    found: &mut BTreeSet<&'a str>,
) -> Result<(), TypedDataError> {
    let (key, fields) = types
        .get_key_value(name)
        .ok_or_else(|| TypedDataError::UnknownType(name.to_string()))?;
    if !found.insert(key.as_str()) {
        return Ok(());
    }
    for field in fields {
        let base = base_type(&field.r#type);
        if types.contains_key(base) {
            collect_dependencies(types, base, found)?;
        } else if Primitive::parse(base).is_none() {
            return Err(TypedDataError::UnknownType(field.r#type.clone()));
        }
    }
    Ok(())
}

/// Canonical type string: `primary`'s own definition followed by every
/// struct it references, sorted by name.
///
/// ```text
/// Mail(Person from,Person[] to,string contents)Person(string name,address[] wallets)
/// ```
pub fn encode_type(types: &Types, primary: &str) -> Result<String, TypedDataError> {
    let mut found = BTreeSet::new();
    collect_dependencies(types, primary, &mut found)?;
    found.remove(primary);

    let mut out = String::new();
    for name in std::iter::once(primary).chain(found) {
        let fields = types
            .get(name)
            .ok_or_else(|| TypedDataError::UnknownType(name.to_string()))?;
        out.push_str(name);
        out.push('(');
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&field.r#type);
            out.push(' ');
            out.push_str(&field.name);
        }
        out.push(')');
    }
    Ok(out)
}

pub fn type_hash(types: &Types, name: &str) -> Result<B256, TypedDataError> {
    Ok(keccak256(encode_type(types, name)?.as_bytes()))
}

/// One 32-byte word per declared field, in declaration order.
pub fn encode_data(
    types: &Types,
    name: &str,
    value: &Map<String, Value>,
) -> Result<Vec<u8>, TypedDataError> {
    let fields = types
        .get(name)
        .ok_or_else(|| TypedDataError::UnknownType(name.to_string()))?;
    let mut out = Vec::with_capacity(32 * fields.len());
    for field in fields {
        let field_value = value
            .get(&field.name)
            .ok_or_else(|| TypedDataError::MissingField {
                type_name: name.to_string(),
                field: field.name.clone(),
            })?;
        out.extend_from_slice(encode_field(types, &field.r#type, field_value)?.as_slice());
    }
    Ok(out)
}

/// `keccak256(type_hash ‖ encode_data)`
pub fn hash_struct(
    types: &Types,
    name: &str,
    value: &Map<String, Value>,
) -> Result<B256, TypedDataError> {
    let mut buf = type_hash(types, name)?.to_vec();
    buf.extend(encode_data(types, name, value)?);
    Ok(keccak256(buf))
}

fn encode_field(types: &Types, ty: &str, value: &Value) -> Result<B256, TypedDataError> {
    if let Some((inner, len)) = split_array(ty)? {
        let items = value
            .as_array()
            .ok_or_else(|| TypedDataError::invalid(ty, "expected an array"))?;
        if let Some(expected) = len {
            if items.len() != expected {
                return Err(TypedDataError::ArrayLength {
                    type_name: ty.to_string(),
                    expected,
                    actual: items.len(),
                });
            }
        }
        let mut buf = Vec::with_capacity(32 * items.len());
        for item in items {
            buf.extend_from_slice(encode_field(types, inner, item)?.as_slice());
        }
        return Ok(keccak256(buf));
    }

    if types.contains_key(ty) {
        let fields = value
            .as_object()
            .ok_or_else(|| TypedDataError::invalid(ty, "expected an object"))?;
        return hash_struct(types, ty, fields);
    }

    let primitive =
        Primitive::parse(ty).ok_or_else(|| TypedDataError::UnknownType(ty.to_string()))?;
    encode_primitive(primitive, ty, value)
}

fn encode_primitive(primitive: Primitive, ty: &str, value: &Value) -> Result<B256, TypedDataError> {
    match primitive {
        Primitive::String => {
            let s = value
                .as_str()
                .ok_or_else(|| TypedDataError::invalid(ty, "expected a string"))?;
            Ok(keccak256(s.as_bytes()))
        }
        Primitive::Bytes => Ok(keccak256(decode_hex(ty, value)?)),
        Primitive::FixedBytes(width) => {
            let bytes = decode_hex(ty, value)?;
            if bytes.len() > width {
                return Err(TypedDataError::invalid(
                    ty,
                    format!("{} bytes do not fit in {width}", bytes.len()),
                ));
            }
            let mut word = [0u8; 32];
            for (dst, src) in word.iter_mut().zip(&bytes) {
                *dst = *src;
            }
            Ok(B256::from(word))
        }
        Primitive::Address => {
            let s = value
                .as_str()
                .ok_or_else(|| TypedDataError::invalid(ty, "expected a hex string"))?;
            let address =
                Address::from_str(s).map_err(|e| TypedDataError::invalid(ty, e.to_string()))?;
            Ok(address.into_word())
        }
        Primitive::Bool => {
            let b = value
                .as_bool()
                .ok_or_else(|| TypedDataError::invalid(ty, "expected a bool"))?;
            Ok(B256::from(U256::from(u8::from(b)).to_be_bytes::<32>()))
        }
        Primitive::Uint(bits) => {
            let (sign, magnitude) = parse_integer(ty, value)?;
            if sign == Sign::Negative && !magnitude.is_zero() {
                return Err(TypedDataError::invalid(ty, "negative value for unsigned type"));
            }
            if magnitude.bit_len() > bits {
                return Err(TypedDataError::invalid(ty, format!("{magnitude} overflows {bits} bits")));
            }
            Ok(B256::from(magnitude.to_be_bytes::<32>()))
        }
        Primitive::Int(bits) => {
            let (sign, magnitude) = parse_integer(ty, value)?;
            let limit = U256::from(1u8) << (bits - 1);
            let in_range = match sign {
                Sign::Negative => magnitude <= limit,
                Sign::Positive => magnitude < limit,
            };
            if !in_range {
                return Err(TypedDataError::invalid(ty, format!("value overflows {bits} bits")));
            }
            let signed = I256::checked_from_sign_and_abs(sign, magnitude)
                .ok_or_else(|| TypedDataError::invalid(ty, "value out of range"))?;
            Ok(B256::from(signed.into_raw().to_be_bytes::<32>()))
        }
    }
}

fn decode_hex(ty: &str, value: &Value) -> Result<Vec<u8>, TypedDataError> {
    let s = value
        .as_str()
        .ok_or_else(|| TypedDataError::invalid(ty, "expected a hex string"))?;
    let body = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(body).map_err(|e| TypedDataError::invalid(ty, e.to_string()))
}

/// Integers may be JSON numbers, decimal strings or `0x` hex strings, with an
/// optional leading `-` on strings.
fn parse_integer(ty: &str, value: &Value) -> Result<(Sign, U256), TypedDataError> {
    let invalid = || TypedDataError::invalid(ty, format!("cannot parse {value} as an integer"));
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok((Sign::Positive, U256::from(u)))
            } else if let Some(i) = n.as_i64() {
                Ok((Sign::Negative, U256::from(i.unsigned_abs())))
            } else {
                Err(invalid())
            }
        }
        Value::String(s) => {
            let (sign, digits) = match s.strip_prefix('-') {
                Some(rest) => (Sign::Negative, rest),
                None => (Sign::Positive, s.as_str()),
            };
            let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
                Some(hex) if !hex.is_empty() => U256::from_str_radix(hex, 16).ok(),
                Some(_) => None,
                None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                    U256::from_str_radix(digits, 10).ok()
                }
                None => None,
            };
            magnitude.map(|m| (sign, m)).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

impl TypedData {
    /// `hash_struct("EIP712Domain", domain)`. When the document's types omit
    /// `EIP712Domain`, the field list is derived from the domain value.
    pub fn domain_separator(&self) -> Result<B256, TypedDataError> {
        let message = self.domain.to_message();
        if self.types.contains_key(EIP712_DOMAIN) {
            return hash_struct(&self.types, EIP712_DOMAIN, &message);
        }
        let mut types = Types::new();
        types.insert(EIP712_DOMAIN.to_string(), self.domain.types());
        hash_struct(&types, EIP712_DOMAIN, &message)
    }

    pub fn struct_hash(&self) -> Result<B256, TypedDataError> {
        hash_struct(&self.types, &self.primary_type, &self.message)
    }

    /// `0x19 0x01 ‖ domain_separator ‖ struct_hash`
    pub fn signing_preimage(&self) -> Result<[u8; PREIMAGE_LEN], TypedDataError> {
        let domain = self.domain_separator()?;
        let message = self.struct_hash()?;

        let mut out = [0u8; PREIMAGE_LEN];
        let (prefix, rest) = out.split_at_mut(SIGNING_PREFIX.len());
        let (domain_part, message_part) = rest.split_at_mut(32);
        prefix.copy_from_slice(&SIGNING_PREFIX);
        domain_part.copy_from_slice(domain.as_slice());
        message_part.copy_from_slice(message.as_slice());
        Ok(out)
    }

    /// The digest a wallet signs for this document.
    pub fn hash(&self) -> Result<B256, TypedDataError> {
        Ok(keccak256(self.signing_preimage()?))
    }
}

/// Returns the signing hash along with the 66-byte preimage it was taken over.
pub fn typed_data_and_hash(
    typed_data: &TypedData,
) -> Result<(B256, [u8; PREIMAGE_LEN]), TypedDataError> {
    let preimage = typed_data.signing_preimage()?;
    Ok((keccak256(preimage), preimage))
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Type;
    use serde_json::json;

    fn types_from(defs: &[(&str, &[(&str, &str)])]) -> Types {
        defs.iter()
            .map(|(name, fields)| {
                (
                    name.to_string(),
                    fields.iter().map(|(n, t)| Type::new(*n, *t)).collect(),
                )
            })
            .collect()
    }

    fn single(ty: &str, value: Value) -> Result<B256, TypedDataError> {
        let types = types_from(&[("T", &[("v", ty)])]);
        let message = json!({ "v": value });
        encode_data(&types, "T", message.as_object().unwrap()).map(|b| B256::from_slice(&b))
    }

    #[test]
    fn test_encode_type_sorts_dependencies() {
        // Zebra is declared before Apple, yet Apple must come first.
        let types = types_from(&[
            ("Root", &[("z", "Zebra"), ("a", "Apple[]")]),
            ("Zebra", &[("n", "uint8")]),
            ("Apple", &[("s", "string")]),
        ]);
        assert_eq!(
            encode_type(&types, "Root").unwrap(),
            "Root(Zebra z,Apple[] a)Apple(string s)Zebra(uint8 n)"
        );
    }

    #[test]
    fn test_encode_type_transitive_and_self_reference() {
        let types = types_from(&[
            ("Node", &[("next", "Node[]"), ("leaf", "Leaf")]),
            ("Leaf", &[("owner", "Owner")]),
            ("Owner", &[("a", "address")]),
        ]);
        assert_eq!(
            encode_type(&types, "Node").unwrap(),
            "Node(Node[] next,Leaf leaf)Leaf(Owner owner)Owner(address a)"
        );
    }

    #[test]
    fn test_encode_type_unknown_field_type() {
        let types = types_from(&[("T", &[("x", "Missing")])]);
        assert_eq!(
            encode_type(&types, "T").unwrap_err(),
            TypedDataError::UnknownType("Missing".into())
        );
        assert_eq!(
            encode_type(&types, "Nope").unwrap_err(),
            TypedDataError::UnknownType("Nope".into())
        );
    }

    #[test]
    fn test_missing_field_fails_closed() {
        let types = types_from(&[("T", &[("a", "string"), ("b", "string")])]);
        let message = json!({ "a": "x" });
        assert_eq!(
            hash_struct(&types, "T", message.as_object().unwrap()).unwrap_err(),
            TypedDataError::MissingField {
                type_name: "T".into(),
                field: "b".into()
            }
        );
    }

    #[test]
    fn test_integer_encodings() {
        let one = B256::from(U256::from(1u8).to_be_bytes::<32>());
        assert_eq!(single("uint256", json!(1)).unwrap(), one);
        assert_eq!(single("uint256", json!("1")).unwrap(), one);
        assert_eq!(single("uint256", json!("0x01")).unwrap(), one);
        assert_eq!(single("int8", json!(-1)).unwrap(), B256::repeat_byte(0xff));
        assert_eq!(single("int256", json!("-1")).unwrap(), B256::repeat_byte(0xff));

        assert!(single("uint8", json!(255)).is_ok());
        assert!(single("uint8", json!(256)).is_err());
        assert!(single("uint64", json!(-1)).is_err());
        assert!(single("int8", json!(127)).is_ok());
        assert!(single("int8", json!(128)).is_err());
        assert!(single("int8", json!(-128)).is_ok());
        assert!(single("int8", json!(-129)).is_err());
        assert!(single("uint256", json!("12abc")).is_err());
        assert!(single("uint256", json!(1.5)).is_err());
        assert!(single("uint7", json!(1)).is_err());
    }

    #[test]
    fn test_bytes_and_bool() {
        let word = single("bytes4", json!("0xdeadbeef")).unwrap();
        assert_eq!(&word.as_slice()[..4], &[0xde, 0xad, 0xbe, 0xef]);
        assert!(word.as_slice()[4..].iter().all(|b| *b == 0));
        assert!(single("bytes2", json!("0xdeadbeef")).is_err());

        assert_eq!(single("bytes", json!("0x")).unwrap(), keccak256([]));
        assert_eq!(single("string", json!("")).unwrap(), keccak256([]));
        assert_eq!(single("bool", json!(true)).unwrap(), B256::with_last_byte(1));
        assert!(single("bool", json!("true")).is_err());
    }

    #[test]
    fn test_address_is_left_padded() {
        let word = single("address", json!("0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC")).unwrap();
        assert!(word.as_slice()[..12].iter().all(|b| *b == 0));
        assert!(word.as_slice()[12..].iter().all(|b| *b == 0xcc));
    }

    #[test]
    fn test_fixed_array_length_checked() {
        let types = types_from(&[("T", &[("v", "uint8[2]")])]);
        let ok = json!({ "v": [1, 2] });
        let bad = json!({ "v": [1, 2, 3] });
        assert!(hash_struct(&types, "T", ok.as_object().unwrap()).is_ok());
        assert_eq!(
            hash_struct(&types, "T", bad.as_object().unwrap()).unwrap_err(),
            TypedDataError::ArrayLength {
                type_name: "uint8[2]".into(),
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_empty_array_hashes_empty_buffer() {
        assert_eq!(single("string[]", json!([])).unwrap(), keccak256([]));
    }
}

//! Type-id keyed decoders for actions and auths.
//!
//! A [`Registry`] is filled once during start-up and then shared read-only
//! (usually behind an `Arc`) with every thread that decodes transactions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use vmauth_codec::Reader;

use crate::action::Action;
use crate::auth::Auth;
use crate::error::ChainError;

/// Decoder for one registered type.
pub type UnmarshalFn<T> =
    Box<dyn Fn(&mut Reader<'_>) -> Result<Arc<T>, ChainError> + Send + Sync>;

/// Maps a 1-byte type id to the decoder for that variant.
pub struct TypeParser<T: ?Sized> {
    family: &'static str,
    decoders: BTreeMap<u8, UnmarshalFn<T>>,
}

impl<T: ?Sized> TypeParser<T> {
    pub fn new(family: &'static str) -> Self {
        Self {
            family,
            decoders: BTreeMap::new(),
        }
    }

    /// Register a decoder. Each type id may be registered once.
    pub fn register<F>(&mut self, type_id: u8, decoder: F) -> Result<(), ChainError>
    where
        F: Fn(&mut Reader<'_>) -> Result<Arc<T>, ChainError> + Send + Sync + 'static,
    {
        if self.decoders.contains_key(&type_id) {
            return Err(ChainError::DuplicateTypeId {
                family: self.family,
                type_id,
            });
        }
        self.decoders.insert(type_id, Box::new(decoder));
        tracing::debug!(family = self.family, type_id, "registered decoder");
        Ok(())
    }

    pub fn supports(&self, type_id: u8) -> bool {
        self.decoders.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    /// Decode the payload of a `type_id` value from `reader`.
    pub fn unmarshal(&self, type_id: u8, reader: &mut Reader<'_>) -> Result<Arc<T>, ChainError> {
        let decoder = self
            .decoders
            .get(&type_id)
            .ok_or(ChainError::UnknownTypeId {
                family: self.family,
                type_id,
            })?;
        decoder(reader)
    }
}

impl<T: ?Sized> fmt::Debug for TypeParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeParser")
            .field("family", &self.family)
            .field("type_ids", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Decoders for every action and auth variant the chain accepts.
#[derive(Debug)]
pub struct Registry {
    pub actions: TypeParser<dyn Action>,
    pub auths: TypeParser<dyn Auth>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            actions: TypeParser::new("action"),
            auths: TypeParser::new("auth"),
        }
    }

    /// Freeze the registry for concurrent readers.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut parser: TypeParser<u64> = TypeParser::new("number");
        parser
            .register(1, |r: &mut Reader<'_>| Ok(Arc::new(r.unpack_u64())))
            .unwrap();
        let err = parser
            .register(1, |r: &mut Reader<'_>| Ok(Arc::new(r.unpack_u64())))
            .unwrap_err();
        assert_eq!(
            err,
            ChainError::DuplicateTypeId {
                family: "number",
                type_id: 1
            }
        );
        assert_eq!(parser.len(), 1);
    }

    #[test]
    fn test_unknown_type_id() {
        let parser: TypeParser<u64> = TypeParser::new("number");
        let err = parser.unmarshal(7, &mut Reader::new(&[])).unwrap_err();
        assert_eq!(
            err,
            ChainError::UnknownTypeId {
                family: "number",
                type_id: 7
            }
        );
    }

    #[test]
    fn test_dispatch_by_type_id() {
        let mut parser: TypeParser<u64> = TypeParser::new("number");
        parser
            .register(1, |r: &mut Reader<'_>| Ok(Arc::new(u64::from(r.unpack_byte()))))
            .unwrap();
        parser
            .register(2, |r: &mut Reader<'_>| Ok(Arc::new(r.unpack_u64())))
            .unwrap();
        assert!(parser.supports(2));
        assert!(!parser.supports(3));

        let bytes = [0, 0, 0, 0, 0, 0, 1, 0];
        assert_eq!(*parser.unmarshal(2, &mut Reader::new(&bytes)).unwrap(), 256);
        assert_eq!(*parser.unmarshal(1, &mut Reader::new(&[9])).unwrap(), 9);
    }

    #[test]
    fn test_empty_registry() {
        let registry = Registry::new();
        assert!(registry.actions.is_empty());
        assert!(registry.auths.is_empty());
    }
}

//! Transactions: the signable digest and the signed wire form.
//!
//! ```text
//! digest = timestamp:8 | chain_id:32 | max_fee:8 | action_count:1 | (type_id:1 | payload)*
//! wire   = digest | has_auth:1 | [auth_type_id:1 | auth_payload]
//! ```
//!
//! The auth is never part of the digest it signs.

use std::sync::Arc;
use vmauth_codec::{Address, Id, Reader, Writer, BYTE_LEN};

use crate::action::Action;
use crate::auth::{Auth, AuthFactory};
use crate::base::{Base, BASE_SIZE};
use crate::error::ChainError;
use crate::registry::Registry;
use crate::rules::Rules;

/// The action count is a single byte on the wire.
pub const MAX_ACTIONS: usize = u8::MAX as usize;

#[derive(Clone, Debug)]
pub struct Transaction {
    pub base: Base,
    pub actions: Vec<Arc<dyn Action>>,
    pub auth: Option<Arc<dyn Auth>>,
}

/// Two transactions are equal when their base fields match and every
/// action and the auth encode to the same type id and payload.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        let auth_eq = match (&self.auth, &other.auth) {
            (None, None) => true,
            (Some(a), Some(b)) => auth_bytes(a.as_ref()) == auth_bytes(b.as_ref()),
            _ => false,
        };
        self.base == other.base
            && self.actions.len() == other.actions.len()
            && self
                .actions
                .iter()
                .zip(&other.actions)
                .all(|(a, b)| action_bytes(a.as_ref()) == action_bytes(b.as_ref()))
            && auth_eq
    }
}

impl Eq for Transaction {}

fn action_bytes(action: &dyn Action) -> Vec<u8> {
    let mut writer = Writer::new(BYTE_LEN + action.size(), usize::MAX);
    writer.pack_byte(action.type_id());
    action.marshal(&mut writer);
    writer.bytes().to_vec()
}

fn auth_bytes(auth: &dyn Auth) -> Vec<u8> {
    let mut writer = Writer::new(BYTE_LEN + auth.size(), usize::MAX);
    writer.pack_byte(auth.type_id());
    auth.marshal(&mut writer);
    writer.bytes().to_vec()
}

impl Transaction {
    /// An unsigned transaction.
    pub fn new(base: Base, actions: Vec<Arc<dyn Action>>) -> Self {
        Self {
            base,
            actions,
            auth: None,
        }
    }

    pub fn digest_size(&self) -> usize {
        BASE_SIZE
            + BYTE_LEN
            + self
                .actions
                .iter()
                .map(|action| BYTE_LEN + action.size())
                .sum::<usize>()
    }

    /// Size of the full wire form.
    pub fn size(&self) -> usize {
        let auth = self
            .auth
            .as_ref()
            .map_or(0, |auth| BYTE_LEN + auth.size());
        self.digest_size() + BYTE_LEN + auth
    }

    fn marshal_digest(&self, writer: &mut Writer) -> Result<(), ChainError> {
        let count = u8::try_from(self.actions.len()).map_err(|_| ChainError::TooManyActions {
            count: self.actions.len(),
            max: MAX_ACTIONS,
        })?;
        self.base.marshal(writer);
        writer.pack_byte(count);
        for action in &self.actions {
            writer.pack_byte(action.type_id());
            action.marshal(writer);
        }
        Ok(())
    }

    /// The bytes every auth scheme signs, directly or through a projection.
    pub fn digest(&self) -> Result<Vec<u8>, ChainError> {
        let size = self.digest_size();
        let mut writer = Writer::new(size, size);
        self.marshal_digest(&mut writer)?;
        Ok(writer.into_bytes()?)
    }

    /// Write the full wire form. Errors from `writer` stay latched in it.
    pub fn marshal(&self, writer: &mut Writer) -> Result<(), ChainError> {
        self.marshal_digest(writer)?;
        match &self.auth {
            Some(auth) => {
                writer.pack_bool(true);
                writer.pack_byte(auth.type_id());
                auth.marshal(writer);
            }
            None => writer.pack_bool(false),
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ChainError> {
        let size = self.size();
        let mut writer = Writer::new(size, size);
        self.marshal(&mut writer)?;
        Ok(writer.into_bytes()?)
    }

    /// Decode one transaction, leaving `reader` positioned after it.
    pub fn unmarshal_from(reader: &mut Reader<'_>, registry: &Registry) -> Result<Self, ChainError> {
        let base = Base::unmarshal(reader)?;

        let count = reader.unpack_byte();
        reader.err()?;
        let mut actions = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let type_id = reader.unpack_byte();
            reader.err()?;
            actions.push(registry.actions.unmarshal(type_id, reader)?);
        }

        let has_auth = reader.unpack_bool();
        reader.err()?;
        let auth = if has_auth {
            let type_id = reader.unpack_byte();
            reader.err()?;
            Some(registry.auths.unmarshal(type_id, reader)?)
        } else {
            None
        };

        Ok(Self {
            base,
            actions,
            auth,
        })
    }

    /// Decode a transaction that must span all of `bytes`.
    pub fn unmarshal(bytes: &[u8], registry: &Registry) -> Result<Self, ChainError> {
        let mut reader = Reader::new(bytes);
        let tx = Self::unmarshal_from(&mut reader, registry)?;
        reader.finish()?;
        Ok(tx)
    }

    /// Sign with `factory` and return the transaction as a verifier would
    /// decode it from the wire.
    pub fn sign(mut self, factory: &dyn AuthFactory, registry: &Registry) -> Result<Self, ChainError> {
        let auth = factory.sign(&self)?;
        self.auth = Some(Arc::from(auth));
        let bytes = self.to_bytes()?;
        Self::unmarshal(&bytes, registry)
    }

    /// SHA-256 of the wire form.
    pub fn id(&self) -> Result<Id, ChainError> {
        Ok(Id::digest(&self.to_bytes()?))
    }

    pub fn verify_auth(&self) -> Result<(), ChainError> {
        let auth = self.auth.as_ref().ok_or(ChainError::MissingAuth)?;
        match auth.verify(self) {
            Ok(()) => {
                tracing::debug!(
                    auth_type = auth.type_id(),
                    actor = ?auth.actor(),
                    action_count = self.actions.len(),
                    "verified transaction auth"
                );
                Ok(())
            }
            Err(err) => {
                tracing::warn!(auth_type = auth.type_id(), error = %err, "auth verification failed");
                Err(err)
            }
        }
    }

    pub fn actor(&self) -> Option<Address> {
        self.auth.as_ref().map(|auth| auth.actor())
    }

    pub fn sponsor(&self) -> Option<Address> {
        self.auth.as_ref().map(|auth| auth.sponsor())
    }

    /// Base units plus every action and the auth.
    pub fn compute_units(&self, rules: &dyn Rules) -> u64 {
        let actions = self
            .actions
            .iter()
            .fold(0u64, |acc, action| acc.saturating_add(action.compute_units(rules)));
        let auth = self.auth.as_ref().map_or(0, |auth| auth.compute_units(rules));
        rules
            .base_compute_units()
            .saturating_add(actions)
            .saturating_add(auth)
    }

    /// Stateless checks against chain rules at wall-clock time `now_ms`.
    /// Signatures are checked separately by [`Transaction::verify_auth`].
    pub fn validate(&self, rules: &dyn Rules, now_ms: i64) -> Result<(), ChainError> {
        self.base.validate(rules, now_ms)?;

        let max_actions = rules.max_actions_per_tx().min(MAX_ACTIONS);
        if self.actions.len() > max_actions {
            return Err(ChainError::TooManyActions {
                count: self.actions.len(),
                max: max_actions,
            });
        }

        let size = self.size();
        if size > rules.max_tx_size() {
            return Err(ChainError::TransactionTooLarge {
                size,
                max: rules.max_tx_size(),
            });
        }

        let timestamp = self.base.timestamp;
        for action in &self.actions {
            if !action.valid_range(rules).contains(timestamp) {
                return Err(ChainError::NotActive {
                    what: "action",
                    type_id: action.type_id(),
                    timestamp,
                });
            }
        }
        if let Some(auth) = &self.auth {
            if !auth.valid_range(rules).contains(timestamp) {
                return Err(ChainError::NotActive {
                    what: "auth",
                    type_id: auth.type_id(),
                    timestamp,
                });
            }
        }
        Ok(())
    }
}

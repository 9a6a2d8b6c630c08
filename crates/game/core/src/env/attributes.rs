//! Persistent per-owner key-value attributes.
//!
//! The engine never owns a persistence substrate. It encodes what it needs to
//! keep (modifier stores, combatant state) and hands the bytes to an injected
//! [`AttributeStore`].

use std::collections::HashMap;

use crate::error::{ErrorSeverity, GameError};
use crate::state::OwnerId;

/// Errors surfaced by attribute backends.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("attribute backend failed: {0}")]
    Backend(String),
}

impl GameError for AttributeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}

/// Key-value store addressed by `(owner, key)`.
pub trait AttributeStore: Send + Sync {
    /// Reads an attribute. A missing attribute is `Ok(None)`.
    fn get(&self, owner: OwnerId, key: &str) -> Result<Option<Vec<u8>>, AttributeError>;

    /// Writes an attribute, replacing any previous value.
    fn set(&mut self, owner: OwnerId, key: &str, value: Vec<u8>) -> Result<(), AttributeError>;

    /// Returns true if the attribute exists.
    fn has(&self, owner: OwnerId, key: &str) -> bool {
        matches!(self.get(owner, key), Ok(Some(_)))
    }

    /// Makes buffered writes durable. Stores without buffering do nothing.
    fn flush(&mut self) -> Result<(), AttributeError> {
        Ok(())
    }
}

/// In-memory attribute store for tests and local runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryAttributes {
    values: HashMap<(OwnerId, String), Vec<u8>>,
}

impl MemoryAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AttributeStore for MemoryAttributes {
    fn get(&self, owner: OwnerId, key: &str) -> Result<Option<Vec<u8>>, AttributeError> {
        Ok(self.values.get(&(owner, key.to_owned())).cloned())
    }

    fn set(&mut self, owner: OwnerId, key: &str, value: Vec<u8>) -> Result<(), AttributeError> {
        self.values.insert((owner, key.to_owned()), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryAttributes::new();
        assert!(!store.has(OwnerId(1), "hp"));

        store.set(OwnerId(1), "hp", vec![1, 2, 3]).unwrap();
        assert!(store.has(OwnerId(1), "hp"));
        assert!(!store.has(OwnerId(2), "hp"));
        assert_eq!(store.get(OwnerId(1), "hp").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.len(), 1);
    }
}

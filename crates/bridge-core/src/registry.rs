//! # Participant Registry
//!
//! Explicit mapping from layer-1 public keys to dense numeric participant
//! ids. The caller owns the registry and passes it where ids are needed;
//! nothing in the workspace keeps a process-global counter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::identity::L1PublicKey;

/// First-seen-order id assignment for layer-1 public keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRegistry {
    ids: BTreeMap<L1PublicKey, u64>,
    keys: Vec<L1PublicKey>,
}

impl ParticipantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `key`, assigning the next free one on first sight.
    pub fn register(&mut self, key: &L1PublicKey) -> u64 {
        if let Some(id) = self.ids.get(key) {
            return *id;
        }
        let id = self.keys.len() as u64;
        self.ids.insert(key.clone(), id);
        self.keys.push(key.clone());
        id
    }

    /// Look up an id without assigning.
    pub fn id_of(&self, key: &L1PublicKey) -> Option<u64> {
        self.ids.get(key).copied()
    }

    /// Reverse lookup.
    pub fn key_of(&self, id: u64) -> Option<&L1PublicKey> {
        usize::try_from(id).ok().and_then(|i| self.keys.get(i))
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no key has been registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex: &str) -> L1PublicKey {
        L1PublicKey::from_hex(hex).unwrap()
    }

    #[test]
    fn ids_are_dense_and_ordered() {
        let mut reg = ParticipantRegistry::new();
        assert_eq!(reg.register(&key("0x01")), 0);
        assert_eq!(reg.register(&key("0x02")), 1);
        assert_eq!(reg.register(&key("0x03")), 2);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut reg = ParticipantRegistry::new();
        let first = reg.register(&key("0xaa"));
        reg.register(&key("0xbb"));
        assert_eq!(reg.register(&key("0xAA")), first);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn lookups() {
        let mut reg = ParticipantRegistry::new();
        reg.register(&key("0x10"));
        assert_eq!(reg.id_of(&key("0x10")), Some(0));
        assert_eq!(reg.id_of(&key("0x11")), None);
        assert_eq!(reg.key_of(0), Some(&key("0x10")));
        assert!(reg.key_of(1).is_none());
        assert!(!reg.is_empty());
    }
}

//! # StorageKeyDeriver — Layer-Specific Storage Slots
//!
//! A storage key is the hash of a sequence of 32-byte words. Each part is
//! serialized to exactly one word and the words are concatenated; the layer
//! selects the hash:
//!
//! | Layer | Hash       |
//! |-------|------------|
//! | `L1`  | Keccak-256 |
//! | `L2`  | `fold`     |
//!
//! Keys for the same parts differ between layers by construction.

use bridge_core::{CommitmentError, FieldWord, L2Address, StorageKeyPart, StorageLayer};

use crate::field_hash::fold;
use crate::keccak::keccak256;

/// Concatenate the word encodings of `parts`.
fn encode_parts(parts: &[StorageKeyPart]) -> Result<Vec<u8>, CommitmentError> {
    let mut buf = Vec::with_capacity(parts.len() * 32);
    for part in parts {
        buf.extend_from_slice(part.to_word()?.as_bytes());
    }
    Ok(buf)
}

/// Derive the storage key of `parts` on `layer`.
pub fn derive_storage_key(
    parts: &[StorageKeyPart],
    layer: StorageLayer,
) -> Result<FieldWord, CommitmentError> {
    let encoded = encode_parts(parts)?;
    Ok(match layer {
        StorageLayer::L1 => keccak256(&encoded),
        StorageLayer::L2 => fold(&encoded),
    })
}

/// Same as [`derive_storage_key`] with the layer given as its selector string.
/// Anything other than `"L1"` or `"L2"` fails with `UnsupportedLayer`.
pub fn derive_storage_key_str(
    parts: &[StorageKeyPart],
    layer: &str,
) -> Result<FieldWord, CommitmentError> {
    derive_storage_key(parts, layer.parse()?)
}

/// Storage keys for `(address, slot)` over each slot in `slots`.
pub fn participant_keys(
    address: L2Address,
    slots: &[u64],
    layer: StorageLayer,
) -> Result<Vec<FieldWord>, CommitmentError> {
    slots
        .iter()
        .map(|slot| {
            derive_storage_key(
                &[StorageKeyPart::from(address), StorageKeyPart::from(*slot)],
                layer,
            )
        })
        .collect()
}

/// A deriver bound to one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKeyDeriver {
    layer: StorageLayer,
}

impl StorageKeyDeriver {
    /// Create a deriver for `layer`.
    pub fn new(layer: StorageLayer) -> Self {
        Self { layer }
    }

    /// The layer this deriver hashes for.
    pub fn layer(&self) -> StorageLayer {
        self.layer
    }

    /// Derive the key for `parts`.
    pub fn derive(&self, parts: &[StorageKeyPart]) -> Result<FieldWord, CommitmentError> {
        derive_storage_key(parts, self.layer)
    }

    /// Keys for several slots of one participant.
    pub fn participant_keys(
        &self,
        address: L2Address,
        slots: &[u64],
    ) -> Result<Vec<FieldWord>, CommitmentError> {
        participant_keys(address, slots, self.layer)
    }
}

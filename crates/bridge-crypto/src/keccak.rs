//! Keccak-256 (the pre-standard SHA-3 padding used by Ethereum-style ledgers).

use bridge_core::FieldWord;
use sha3::{Digest, Keccak256};

/// Keccak-256 of `data` as a 32-byte word.
pub fn keccak256(data: &[u8]) -> FieldWord {
    let digest = Keccak256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    FieldWord::new(out)
}

/// Keccak-256 over the concatenation of several byte slices.
pub fn keccak256_concat<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> FieldWord {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    FieldWord::new(out)
}

//! # Boundary Encodings
//!
//! Tagged variants constructed by callers so that downstream code never
//! guesses the meaning of a byte string from its length.

use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::CommitmentError;
use crate::word::{FieldWord, L2Address};

/// Which ledger layer's storage trie a key targets.
///
/// The two layers hash storage keys with different functions: Keccak-256 on
/// L1, the field-native FieldHash on L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageLayer {
    /// Layer-1 storage trie (Keccak-256).
    L1,
    /// Layer-2 storage trie (FieldHash).
    L2,
}

impl StorageLayer {
    /// The selector string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L1 => "L1",
            Self::L2 => "L2",
        }
    }
}

impl FromStr for StorageLayer {
    type Err = CommitmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L1" => Ok(Self::L1),
            "L2" => Ok(Self::L2),
            other => Err(CommitmentError::UnsupportedLayer(other.to_string())),
        }
    }
}

impl std::fmt::Display for StorageLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An externally supplied curve point.
#[derive(Clone, PartialEq, Eq)]
pub enum PointEncoding {
    /// 32-byte compressed form: little-endian `y`, top bit = parity of `x`.
    Compressed([u8; 32]),
    /// 64-byte affine form: big-endian `x || y`.
    Affine([u8; 64]),
}

impl PointEncoding {
    /// Classify raw bytes by length. Only 32 and 64 are valid.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommitmentError> {
        match bytes.len() {
            32 => {
                let mut out = [0u8; 32];
                out.copy_from_slice(bytes);
                Ok(Self::Compressed(out))
            }
            64 => {
                let mut out = [0u8; 64];
                out.copy_from_slice(bytes);
                Ok(Self::Affine(out))
            }
            n => Err(CommitmentError::InvalidPointEncoding(format!(
                "expected 32 (compressed) or 64 (affine) bytes, got {n}"
            ))),
        }
    }

    /// Borrow the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Compressed(b) => b,
            Self::Affine(b) => b,
        }
    }
}

impl std::fmt::Debug for PointEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compressed(b) => write!(f, "Compressed(0x{})", hex::encode(b)),
            Self::Affine(b) => write!(f, "Affine(0x{})", hex::encode(b)),
        }
    }
}

/// One input of a storage-key derivation, serialized to exactly 32 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKeyPart {
    /// An address, right-aligned.
    Address(L2Address),
    /// An unsigned integer up to 256 bits, big-endian.
    Uint(BigUint),
    /// A raw word, used as-is.
    Word(FieldWord),
}

impl StorageKeyPart {
    /// Serialize the part to its 32-byte slot.
    pub fn to_word(&self) -> Result<FieldWord, CommitmentError> {
        match self {
            Self::Address(addr) => Ok(addr.to_word()),
            Self::Uint(value) => {
                if value.bits() > 256 {
                    return Err(CommitmentError::InvalidInputEncoding(format!(
                        "storage key integer exceeds 256 bits ({} bits)",
                        value.bits()
                    )));
                }
                FieldWord::left_pad(&value.to_bytes_be())
            }
            Self::Word(word) => Ok(*word),
        }
    }
}

impl From<L2Address> for StorageKeyPart {
    fn from(addr: L2Address) -> Self {
        Self::Address(addr)
    }
}

impl From<u64> for StorageKeyPart {
    fn from(value: u64) -> Self {
        Self::Uint(BigUint::from(value))
    }
}

impl From<FieldWord> for StorageKeyPart {
    fn from(word: FieldWord) -> Self {
        Self::Word(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_parses_known_selectors() {
        assert_eq!("L1".parse::<StorageLayer>().unwrap(), StorageLayer::L1);
        assert_eq!("L2".parse::<StorageLayer>().unwrap(), StorageLayer::L2);
    }

    #[test]
    fn layer_rejects_everything_else() {
        for bad in ["l1", "L3", "", "L2 "] {
            let err = bad.parse::<StorageLayer>().unwrap_err();
            assert_eq!(err, CommitmentError::UnsupportedLayer(bad.to_string()));
        }
    }

    #[test]
    fn point_encoding_by_length() {
        assert!(matches!(
            PointEncoding::from_bytes(&[0u8; 32]).unwrap(),
            PointEncoding::Compressed(_)
        ));
        assert!(matches!(
            PointEncoding::from_bytes(&[0u8; 64]).unwrap(),
            PointEncoding::Affine(_)
        ));
        for len in [0, 20, 33, 63, 65] {
            let err = PointEncoding::from_bytes(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, CommitmentError::InvalidPointEncoding(_)));
        }
    }

    #[test]
    fn storage_parts_are_word_aligned() {
        let addr = StorageKeyPart::from(L2Address::from_u64(13));
        assert_eq!(addr.to_word().unwrap(), FieldWord::from_u64(13));

        let slot = StorageKeyPart::from(5u64);
        assert_eq!(slot.to_word().unwrap(), FieldWord::from_u64(5));

        let wide = StorageKeyPart::Uint(BigUint::from(1u8) << 256);
        assert!(wide.to_word().is_err());
    }
}

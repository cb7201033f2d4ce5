//! # Field Words and L2 Addresses
//!
//! `FieldWord` is the common unit of every hash, curve, and tree output: a
//! 32-byte big-endian unsigned integer. `L2Address` is the 20-byte identifier
//! derived from a public key.
//!
//! ## Serde
//!
//! Both types serialize as `0x`-prefixed lowercase hex strings. Deserializing
//! accepts the prefix optionally and left-pads short values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommitmentError;

/// Decode a hex string, with or without a `0x` prefix. An empty string
/// decodes to an empty byte vector.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, CommitmentError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
        .map_err(|e| CommitmentError::InvalidInputEncoding(format!("invalid hex {input:?}: {e}")))
}

/// A 32-byte big-endian word.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldWord([u8; 32]);

impl FieldWord {
    /// The all-zero word.
    pub const ZERO: FieldWord = FieldWord([0u8; 32]);

    /// Wrap raw 32 bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Left-pad up to 32 bytes into a word.
    pub fn left_pad(bytes: &[u8]) -> Result<Self, CommitmentError> {
        if bytes.len() > 32 {
            return Err(CommitmentError::InvalidInputEncoding(format!(
                "word must be at most 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(out))
    }

    /// Encode an integer as a big-endian word.
    pub fn from_u64(value: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    /// Parse a hex string of at most 64 digits, left-padding short values.
    pub fn from_hex(input: &str) -> Result<Self, CommitmentError> {
        Self::left_pad(&decode_hex(input)?)
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Consume into the raw bytes.
    pub fn into_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for FieldWord {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for FieldWord {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for FieldWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldWord({})", self.to_hex())
    }
}

impl std::fmt::Display for FieldWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for FieldWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// A 20-byte layer-2 address.
///
/// Opaque: compared for equality and otherwise only consumed as an integer
/// inside leaf binding.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct L2Address([u8; 20]);

impl L2Address {
    /// Wrap raw 20 bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Take the low 20 bytes of a digest.
    pub fn from_word_low(word: &FieldWord) -> Self {
        let mut out = [0u8; 20];
        out.copy_from_slice(&word.as_bytes()[12..]);
        Self(out)
    }

    /// Encode an integer as an address.
    pub fn from_u64(value: u64) -> Self {
        let mut out = [0u8; 20];
        out[12..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    /// Parse a hex string of at most 40 digits, left-padding short values.
    pub fn from_hex(input: &str) -> Result<Self, CommitmentError> {
        let bytes = decode_hex(input)?;
        if bytes.len() > 20 {
            return Err(CommitmentError::InvalidInputEncoding(format!(
                "address must be at most 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut out = [0u8; 20];
        out[20 - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(out))
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The address right-aligned in a 32-byte word.
    pub fn to_word(&self) -> FieldWord {
        let mut out = [0u8; 32];
        out[12..].copy_from_slice(&self.0);
        FieldWord::new(out)
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for L2Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L2Address({})", self.to_hex())
    }
}

impl std::fmt::Display for L2Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for L2Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for L2Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

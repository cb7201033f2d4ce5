//! # Channel and Participant Identifiers
//!
//! Newtypes for the inputs of deterministic L2 key derivation. A
//! `SeedMaterial` triple is built once per derivation request and never
//! persisted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommitmentError;
use crate::word::{decode_hex, FieldWord};

/// Numeric identifier of a bridge channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

impl ChannelId {
    /// Access the inner integer.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id left-padded to a 32-byte word.
    pub fn to_word(&self) -> FieldWord {
        FieldWord::from_u64(self.0)
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form participant label (e.g. a role name or slot number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantLabel(pub String);

impl ParticipantLabel {
    /// Create a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A layer-1 public key, validated and held as lowercase hex digits.
///
/// The wallet layer supplies the raw key bytes; this type only guarantees the
/// text is well-formed hex so that the derivation seed is canonical.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct L1PublicKey(String);

impl L1PublicKey {
    /// Validate a hex public key. Accepts an optional `0x` prefix and any case.
    pub fn from_hex(input: &str) -> Result<Self, CommitmentError> {
        let bytes = decode_hex(input)?;
        if bytes.is_empty() {
            return Err(CommitmentError::InvalidInputEncoding(
                "layer-1 public key must not be empty".to_string(),
            ));
        }
        Ok(Self(hex::encode(bytes)))
    }

    /// Build from raw key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CommitmentError> {
        if bytes.is_empty() {
            return Err(CommitmentError::InvalidInputEncoding(
                "layer-1 public key must not be empty".to_string(),
            ));
        }
        Ok(Self(hex::encode(bytes)))
    }

    /// `0x`-prefixed lowercase hex, the form mixed into the derivation seed.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.0)
    }
}

impl std::fmt::Debug for L1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.chars().take(16).collect();
        write!(f, "L1PublicKey(0x{prefix}...)")
    }
}

impl std::fmt::Display for L1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_prefixed_hex())
    }
}

impl Serialize for L1PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for L1PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Inputs of one deterministic L2 identity derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMaterial {
    /// Layer-1 public key of the participant.
    pub l1_public_key: L1PublicKey,
    /// Channel the identity is scoped to.
    pub channel_id: ChannelId,
    /// Participant label within the channel.
    pub label: ParticipantLabel,
}

impl SeedMaterial {
    /// Assemble seed material from its three parts.
    pub fn new(l1_public_key: L1PublicKey, channel_id: ChannelId, label: ParticipantLabel) -> Self {
        Self {
            l1_public_key,
            channel_id,
            label,
        }
    }

    /// Parse seed material from a hex public key.
    pub fn from_hex(
        l1_public_key_hex: &str,
        channel_id: u64,
        label: &str,
    ) -> Result<Self, CommitmentError> {
        Ok(Self::new(
            L1PublicKey::from_hex(l1_public_key_hex)?,
            ChannelId(channel_id),
            ParticipantLabel::new(label),
        ))
    }

    /// The seed string: public key hex, channel id in decimal, then label.
    pub fn seed_string(&self) -> String {
        format!(
            "{}{}{}",
            self.l1_public_key.to_prefixed_hex(),
            self.channel_id,
            self.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_is_normalized() {
        let a = L1PublicKey::from_hex("0xABCDEF").unwrap();
        let b = L1PublicKey::from_hex("abcdef").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_prefixed_hex(), "0xabcdef");
    }

    #[test]
    fn public_key_rejects_bad_hex() {
        for bad in ["", "0x", "0xabc", "xyz1", "0x0g"] {
            let err = L1PublicKey::from_hex(bad).unwrap_err();
            assert!(
                matches!(err, CommitmentError::InvalidInputEncoding(_)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn seed_string_concatenates_in_order() {
        let seed = SeedMaterial::from_hex("0x04AA", 42, "alice").unwrap();
        assert_eq!(seed.seed_string(), "0x04aa42alice");
    }

    #[test]
    fn channel_id_word() {
        assert_eq!(ChannelId(7).to_word(), FieldWord::from_u64(7));
        assert_eq!(ChannelId(7).to_string(), "7");
    }

    #[test]
    fn public_key_debug_is_truncated() {
        let key = L1PublicKey::from_hex(&"ab".repeat(65)).unwrap();
        let dbg = format!("{key:?}");
        assert!(dbg.len() < 40);
        assert!(dbg.ends_with("...)"));
    }
}

//! # uint256 Balances
//!
//! Balances are unsigned 256-bit integers. They are carried as decimal strings
//! in configuration and JSON because JSON numbers cannot hold them.

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CommitmentError;
use crate::word::FieldWord;

/// An unsigned balance bounded by `2^256 - 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Balance(BigUint);

impl Balance {
    /// Wrap a big integer, rejecting values wider than 256 bits.
    pub fn new(value: BigUint) -> Result<Self, CommitmentError> {
        if value.bits() > 256 {
            return Err(CommitmentError::InvalidInputEncoding(format!(
                "balance exceeds 256 bits ({} bits)",
                value.bits()
            )));
        }
        Ok(Self(value))
    }

    /// The zero balance.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// Parse a base-10 string.
    pub fn from_decimal(input: &str) -> Result<Self, CommitmentError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommitmentError::InvalidInputEncoding(format!(
                "balance must be a decimal integer, got {input:?}"
            )));
        }
        let value = BigUint::parse_bytes(trimmed.as_bytes(), 10).ok_or_else(|| {
            CommitmentError::InvalidInputEncoding(format!("unparseable balance {input:?}"))
        })?;
        Self::new(value)
    }

    /// Access the integer value.
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// The balance as a big-endian word.
    pub fn to_word(&self) -> FieldWord {
        let mut out = [0u8; 32];
        let bytes = self.0.to_bytes_be();
        // bits() <= 256 is enforced by every constructor.
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        FieldWord::new(out)
    }
}

impl From<u64> for Balance {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for Balance {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl std::fmt::Display for Balance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_str_radix(10))
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_decimal(&s).map_err(serde::de::Error::custom)
    }
}

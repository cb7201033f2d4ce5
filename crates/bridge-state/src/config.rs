//! # Channel Configuration
//!
//! YAML description of a channel to initialize:
//!
//! ```yaml
//! channel_id: 0
//! tree_depth: 3
//! participants:
//!   - label: alice
//!     l1_public_key: "0x04ab..."
//!     balance: "1000000000000000000"
//!   - address: "0x000000000000000000000000000000000000000d"
//!     balance: "2000000000000000000"
//! ```
//!
//! A participant gives either `label` + `l1_public_key`, whose L2 address is
//! derived, or a literal `address`. Balances are decimal strings.

use std::path::Path;

use bridge_core::{
    Balance, BridgeError, ChannelId, L1PublicKey, L2Address, ParticipantLabel,
    ParticipantRegistry, SeedMaterial,
};
use bridge_crypto::accumulator::MAX_TREE_DEPTH;
use bridge_crypto::{derive_batch, DEFAULT_TREE_DEPTH};
use serde::{Deserialize, Serialize};

use crate::channel::{initialize_channel, ChannelCommitment, ChannelParticipant};

/// One participant entry as written in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParticipantConfig {
    /// Label used in the derivation seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Layer-1 public key, hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1_public_key: Option<String>,
    /// Literal L2 address, hex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Balance in base units, decimal.
    pub balance: String,
}

/// A channel definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Channel id.
    pub channel_id: u64,
    /// Accumulator depth; defaults to 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_depth: Option<u32>,
    /// Participants in insertion order.
    pub participants: Vec<ParticipantConfig>,
}

enum AddressSource {
    Derived(SeedMaterial),
    Literal(L2Address),
}

impl ChannelConfig {
    /// Parse a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, BridgeError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| BridgeError::Serialization(format!("invalid channel YAML: {e}")))
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self, BridgeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| BridgeError::Config(format!("{}: {e}", path.display())))
    }

    /// The configured depth, or the default.
    pub fn tree_depth(&self) -> Result<u32, BridgeError> {
        let depth = self.tree_depth.unwrap_or(DEFAULT_TREE_DEPTH);
        if !(1..=MAX_TREE_DEPTH).contains(&depth) {
            return Err(BridgeError::Config(format!(
                "tree_depth must be between 1 and {MAX_TREE_DEPTH}, got {depth}"
            )));
        }
        Ok(depth)
    }

    /// Validate every entry and derive addresses where needed.
    ///
    /// Layer-1 keys are registered in `registry` in participant order.
    pub fn resolve_participants(
        &self,
        registry: &mut ParticipantRegistry,
    ) -> Result<Vec<ChannelParticipant>, BridgeError> {
        let channel_id = ChannelId(self.channel_id);
        let mut sources = Vec::with_capacity(self.participants.len());
        let mut balances = Vec::with_capacity(self.participants.len());

        for (index, entry) in self.participants.iter().enumerate() {
            let source = match (&entry.l1_public_key, &entry.label, &entry.address) {
                (Some(key), Some(label), None) => {
                    let key = L1PublicKey::from_hex(key)
                        .map_err(|e| participant_error(index, &e.to_string()))?;
                    registry.register(&key);
                    AddressSource::Derived(SeedMaterial::new(
                        key,
                        channel_id,
                        ParticipantLabel::new(label.as_str()),
                    ))
                }
                (None, None, Some(address)) => AddressSource::Literal(
                    L2Address::from_hex(address)
                        .map_err(|e| participant_error(index, &e.to_string()))?,
                ),
                (Some(_), _, Some(_)) => {
                    return Err(participant_error(
                        index,
                        "give either l1_public_key or address, not both",
                    ))
                }
                (None, Some(_), Some(_)) => {
                    return Err(participant_error(
                        index,
                        "label is only used with l1_public_key",
                    ))
                }
                (Some(_), None, None) => {
                    return Err(participant_error(index, "l1_public_key requires a label"))
                }
                (None, _, None) => {
                    return Err(participant_error(
                        index,
                        "missing l1_public_key or address",
                    ))
                }
            };
            sources.push(source);
            balances.push(
                Balance::from_decimal(&entry.balance)
                    .map_err(|e| participant_error(index, &e.to_string()))?,
            );
        }

        let seeds: Vec<SeedMaterial> = sources
            .iter()
            .filter_map(|s| match s {
                AddressSource::Derived(seed) => Some(seed.clone()),
                AddressSource::Literal(_) => None,
            })
            .collect();
        let mut derived = derive_batch(&seeds).into_iter();

        let mut participants = Vec::with_capacity(sources.len());
        for (source, balance) in sources.into_iter().zip(balances) {
            let address = match source {
                AddressSource::Literal(address) => address,
                AddressSource::Derived(_) => derived
                    .next()
                    .map(|identity| identity.address)
                    .ok_or_else(|| BridgeError::Config("derivation count mismatch".to_string()))?,
            };
            participants.push(ChannelParticipant::new(address, balance));
        }
        Ok(participants)
    }

    /// Resolve participants and run channel initialization.
    pub fn initialize(
        &self,
        registry: &mut ParticipantRegistry,
    ) -> Result<ChannelCommitment, BridgeError> {
        let depth = self.tree_depth()?;
        let participants = self.resolve_participants(registry)?;
        Ok(initialize_channel(ChannelId(self.channel_id), &participants, depth)?)
    }
}

fn participant_error(index: usize, reason: &str) -> BridgeError {
    BridgeError::Config(format!("participant {index}: {reason}"))
}

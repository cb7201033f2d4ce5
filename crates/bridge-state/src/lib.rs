//! # bridge-state — Channel State Initialization
//!
//! Turns an ordered participant list into a channel state commitment:
//!
//! - **Leaf binding** (`leaf.rs`): `compute_leaf` binds an address and a
//!   balance to the channel id (or an earlier root) with Keccak-256 and
//!   wrapping 256-bit arithmetic.
//! - **Driver** (`channel.rs`): `ChannelSession` inserts leaves into its own
//!   `MerkleAccumulator` one participant at a time and records a
//!   `ParticipantLeaf` audit trail; `ChannelCommitment::verify` replays it.
//! - **Configuration** (`config.rs`): YAML channel definitions resolved into
//!   participants, deriving L2 addresses from layer-1 keys where asked.

pub mod channel;
pub mod config;
pub mod leaf;

pub use channel::{
    initialize_channel, initialize_channel_default, ChannelCommitment, ChannelParticipant,
    ChannelSession, ParticipantLeaf,
};
pub use config::{ChannelConfig, ParticipantConfig};
pub use leaf::{compute_leaf, previous_root, INITIALIZATION_NONCE};

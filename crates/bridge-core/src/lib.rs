//! # bridge-core — Foundational Types for Channel Commitments
//!
//! This crate is the leaf of the workspace DAG. It defines the value types
//! shared by identity derivation, storage-key derivation, and the channel
//! commitment accumulator. It contains no cryptography.
//!
//! ## Key Design Principles
//!
//! 1. **Fixed-width newtypes.** `FieldWord` is always 32 bytes and
//!    `L2Address` always 20 bytes. Left-zero-padding happens in the
//!    constructors, never at the call site.
//!
//! 2. **Ambiguity resolved at the boundary.** Curve points arrive as a tagged
//!    `PointEncoding`, storage layers as a `StorageLayer` enum, and storage-key
//!    inputs as `StorageKeyPart` variants. The core never inspects byte
//!    lengths to guess what a value means.
//!
//! 3. **Injected mappings, no ambient state.** Public-key-to-id assignment
//!    lives in an explicit `ParticipantRegistry` value owned by the caller.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bridge-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod encoding;
pub mod error;
pub mod identity;
pub mod registry;
pub mod word;

// Re-export primary types for ergonomic imports.
pub use amount::Balance;
pub use encoding::{PointEncoding, StorageKeyPart, StorageLayer};
pub use error::{BridgeError, CommitmentError};
pub use identity::{ChannelId, L1PublicKey, ParticipantLabel, SeedMaterial};
pub use registry::ParticipantRegistry;
pub use word::{FieldWord, L2Address};

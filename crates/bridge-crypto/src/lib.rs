//! # bridge-crypto — Cryptographic Primitives
//!
//! Re-derives, bit for bit, the commitment values the reference ledger
//! contract computes on-chain:
//!
//! - **FieldHash** (`field_hash`): folds arbitrary bytes into one field word
//!   with an arity-2 Poseidon compression over the BLS12-381 scalar field.
//! - **Keccak-256** (`keccak`): the standard 256-bit hash used for L1 storage
//!   keys, derivation seeds, and leaf binding.
//! - **CurveIdentity** (`curve`): seed → Jubjub scalar → public point →
//!   20-byte L2 address.
//! - **StorageKeyDeriver** (`storage_key`): word-aligned key material hashed
//!   per ledger layer.
//! - **MerkleAccumulator** (`accumulator`): append-only, fixed-depth, 4-ary
//!   Merkle tree holding one cached node per level.
//!
//! ## Crate Policy
//!
//! - Depends only on `bridge-core` internally.
//! - Known-answer tests pin every primitive; a changed constant must fail a
//!   test, never silently change a root.
//! - Private scalars are never logged or serialized implicitly.

pub mod accumulator;
pub mod curve;
pub mod field;
pub mod field_hash;
pub mod keccak;
pub mod poseidon;
pub mod storage_key;

pub use accumulator::{AccumulatorPhase, MerkleAccumulator, DEFAULT_TREE_DEPTH};
pub use curve::{address_from_point, derive, derive_batch, CurveKeyPair, DerivedIdentity};
pub use field_hash::{empty_digest, fold, hash_four, hash_two};
pub use keccak::keccak256;
pub use storage_key::{derive_storage_key, participant_keys, StorageKeyDeriver};

//! # Error Types — Structured Error Hierarchy
//!
//! Every error in this workspace is a local precondition violation detected
//! synchronously at the bad input. None of them is retryable: the same input
//! reproduces the same failure. Callers must treat any of them as fatal to the
//! current channel-initialization attempt and must not publish a partially
//! computed root.

use thiserror::Error;

/// Top-level error type for the channel commitment stack.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// A commitment computation rejected its input.
    #[error(transparent)]
    Commitment(#[from] CommitmentError),

    /// Channel configuration is malformed or inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors raised by identity derivation, storage keys, leaf binding, and the
/// Merkle accumulator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    /// Malformed hex, or a byte string of the wrong length for a key,
    /// address, word, or balance.
    #[error("invalid input encoding: {0}")]
    InvalidInputEncoding(String),

    /// Curve point bytes are not 32 or 64 bytes long, or do not decode to a
    /// point on the curve.
    #[error("invalid point encoding: {0}")]
    InvalidPointEncoding(String),

    /// Storage-key layer selector outside the known set.
    #[error("unsupported storage layer {0:?}: expected \"L1\" or \"L2\"")]
    UnsupportedLayer(String),

    /// Leaf binding requested a nonce beyond the recorded root sequence.
    #[error("nonce {nonce} requires {nonce} recorded roots, only {available} available")]
    InvalidRootSequenceAccess {
        /// Requested nonce.
        nonce: usize,
        /// Number of roots recorded so far.
        available: usize,
    },

    /// Insertion attempted beyond the tree's `4^depth` capacity.
    #[error("merkle tree full: capacity of {capacity} leaves reached")]
    TreeFull {
        /// Maximum number of leaves.
        capacity: u64,
    },

    /// Replaying a recorded audit trail produced a different leaf or root.
    #[error("audit trail mismatch at participant {participant_index}: {detail}")]
    AuditMismatch {
        /// Position of the first diverging participant.
        participant_index: usize,
        /// Which recorded value diverged.
        detail: String,
    },
}

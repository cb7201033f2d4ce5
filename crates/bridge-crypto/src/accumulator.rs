//! # MerkleAccumulator — Incremental 4-ary Merkle Tree
//!
//! An append-only tree of fixed depth `D` and arity 4 that keeps only the
//! frontier instead of the full tree: for every level, the completed nodes
//! of the group that is still open (at most three). Every insertion produces
//! a new root, and the full root sequence is recorded.
//!
//! ## Algorithm
//!
//! For the leaf at index `i`, walk upward from level 0 with `idx = i`:
//!
//! - Place the node at position `idx mod 4` of its group. If every node
//!   below it was the last of its group, the node is complete and is kept in
//!   the frontier for its right siblings.
//! - `idx == 0`: the node is the leftmost of the whole tree so far, so it is
//!   the root. Stop climbing.
//! - otherwise: hash the four slots with `H4`. Slots left of the node hold
//!   the completed siblings from the frontier, slots right of it are zero.
//!   Continue at `level + 1` with `idx / 4`.
//!
//! The root after the first leaf is therefore the leaf itself, and after `k`
//! leaves the root is the smallest 4-ary tree holding all of them with absent
//! subtrees as the zero word.
//!
//! ## Security Invariant
//!
//! Insertion order determines every root. The accumulator takes `&mut self`
//! for inserts and is owned by a single channel computation; it is never
//! shared between channels.

use bridge_core::{CommitmentError, FieldWord};
use serde::{Deserialize, Serialize};

use crate::field_hash::hash_four;

/// Depth used by channel initialization unless configured otherwise.
pub const DEFAULT_TREE_DEPTH: u32 = 3;

/// Largest accepted depth.
pub const MAX_TREE_DEPTH: u32 = 16;

const ARITY: u64 = 4;

/// Completed left siblings of the open group at one level.
type Frontier = [FieldWord; 3];

/// Lifecycle of an accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccumulatorPhase {
    /// No leaf inserted yet.
    Empty,
    /// `k` leaves inserted, room for more.
    Inserting(u64),
    /// All `4^D` slots used.
    Full,
}

/// Fixed-depth append-only 4-ary Merkle tree with O(D) state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleAccumulator {
    depth: u32,
    frontier: Vec<Frontier>,
    next_leaf_index: u64,
    root_sequence: Vec<FieldWord>,
}

impl MerkleAccumulator {
    /// Create an empty tree of the given depth (`1..=16`).
    pub fn new(depth: u32) -> Result<Self, CommitmentError> {
        if !(1..=MAX_TREE_DEPTH).contains(&depth) {
            return Err(CommitmentError::InvalidInputEncoding(format!(
                "tree depth must be between 1 and {MAX_TREE_DEPTH}, got {depth}"
            )));
        }
        Ok(Self {
            depth,
            frontier: vec![[FieldWord::ZERO; 3]; depth as usize + 1],
            next_leaf_index: 0,
            root_sequence: Vec::new(),
        })
    }

    /// Tree depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Maximum number of leaves, `4^depth`.
    pub fn capacity(&self) -> u64 {
        ARITY.pow(self.depth)
    }

    /// Index the next leaf will occupy.
    pub fn next_leaf_index(&self) -> u64 {
        self.next_leaf_index
    }

    /// The most recent root, if any leaf has been inserted.
    pub fn root(&self) -> Option<FieldWord> {
        self.root_sequence.last().copied()
    }

    /// Every root produced so far, in insertion order.
    pub fn root_sequence(&self) -> &[FieldWord] {
        &self.root_sequence
    }

    /// The leftmost completed subtree built from nodes at `level`, used as
    /// slot 0 of the open group at `level + 1`. Zero until the first group of
    /// four nodes at `level` fills; `None` for levels outside the tree.
    pub fn cached_subtree(&self, level: usize) -> Option<FieldWord> {
        if level >= self.depth as usize {
            return None;
        }
        self.frontier.get(level + 1).map(|siblings| siblings[0])
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> AccumulatorPhase {
        match self.next_leaf_index {
            0 => AccumulatorPhase::Empty,
            n if n >= self.capacity() => AccumulatorPhase::Full,
            n => AccumulatorPhase::Inserting(n),
        }
    }

    /// Append a leaf and return the new root.
    pub fn insert(&mut self, leaf_value: FieldWord) -> Result<FieldWord, CommitmentError> {
        let capacity = self.capacity();
        if self.next_leaf_index >= capacity {
            return Err(CommitmentError::TreeFull { capacity });
        }

        let leaf_index = self.next_leaf_index;
        let mut index = leaf_index;
        let mut current = leaf_value;
        let mut complete = true;
        for siblings in self.frontier.iter_mut() {
            let position = (index % ARITY) as usize;
            if complete && position < siblings.len() {
                siblings[position] = current;
            }
            if index == 0 {
                break;
            }
            let mut children = [FieldWord::ZERO; 4];
            children[..position].copy_from_slice(&siblings[..position]);
            children[position] = current;
            current = hash_four(&children);
            complete &= position == 3;
            index /= ARITY;
        }

        self.root_sequence.push(current);
        self.next_leaf_index += 1;
        tracing::debug!(leaf_index, root = %current, "inserted leaf");
        if self.next_leaf_index == capacity {
            tracing::warn!(capacity, "merkle accumulator reached capacity");
        }
        Ok(current)
    }
}

impl Default for MerkleAccumulator {
    fn default() -> Self {
        Self {
            depth: DEFAULT_TREE_DEPTH,
            frontier: vec![[FieldWord::ZERO; 3]; DEFAULT_TREE_DEPTH as usize + 1],
            next_leaf_index: 0,
            root_sequence: Vec::new(),
        }
    }
}

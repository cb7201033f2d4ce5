//! # Channel State Initialization
//!
//! Drives leaf binding and Merkle insertion for every participant of one
//! channel, in fixed order, and records the audit trail.
//!
//! ## Ownership
//!
//! A `ChannelSession` owns its `MerkleAccumulator` exclusively. Insertions
//! happen one at a time through `&mut self`, and `finalize` consumes the
//! session, so a finished channel cannot be appended to. Independent channels
//! each get their own session.
//!
//! Leaf values depend only on the channel id and the participant (the nonce
//! is fixed at zero), so `initialize_channel` computes them in parallel
//! before the strictly sequential insertion pass.
//!
//! ## Failure
//!
//! Any error aborts the whole channel. No partial commitment is returned.

use bridge_core::{Balance, ChannelId, CommitmentError, FieldWord, L2Address};
use bridge_crypto::{MerkleAccumulator, DEFAULT_TREE_DEPTH};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::leaf::{compute_leaf, INITIALIZATION_NONCE};

/// Account data for one participant, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelParticipant {
    /// L2 address of the participant.
    pub address: L2Address,
    /// Balance committed for the participant.
    pub balance: Balance,
}

impl ChannelParticipant {
    /// Bundle an address and balance.
    pub fn new(address: L2Address, balance: Balance) -> Self {
        Self { address, balance }
    }
}

/// Audit-trail record for one inserted participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantLeaf {
    /// Position in the channel's participant order.
    pub participant_index: usize,
    /// L2 address of the participant.
    pub address: L2Address,
    /// Committed balance.
    pub balance: Balance,
    /// Bound leaf value inserted into the tree.
    pub leaf_value: FieldWord,
    /// Checkpoint root recorded right after this leaf was inserted.
    pub root_after_insertion: FieldWord,
}

/// The finished state commitment of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCommitment {
    /// Channel the commitment belongs to.
    pub channel_id: ChannelId,
    /// Depth of the accumulator that produced the roots.
    pub tree_depth: u32,
    /// Participants in insertion order.
    pub participants: Vec<ParticipantLeaf>,
    /// Root after the last insertion. `None` for a channel without
    /// participants.
    pub final_root: Option<FieldWord>,
}

impl ChannelCommitment {
    /// Every checkpoint root in insertion order.
    pub fn root_sequence(&self) -> Vec<FieldWord> {
        self.participants
            .iter()
            .map(|p| p.root_after_insertion)
            .collect()
    }

    /// Replay leaf binding and insertion over the recorded participants and
    /// check every recorded value.
    pub fn verify(&self) -> Result<(), CommitmentError> {
        let mut session = ChannelSession::new(self.channel_id, self.tree_depth)?;
        for (index, recorded) in self.participants.iter().enumerate() {
            if recorded.participant_index != index {
                return Err(mismatch(
                    index,
                    format!("recorded index {}", recorded.participant_index),
                ));
            }
            let replayed = session.push(ChannelParticipant::new(
                recorded.address,
                recorded.balance.clone(),
            ))?;
            if replayed.leaf_value != recorded.leaf_value {
                return Err(mismatch(
                    index,
                    format!(
                        "leaf value {} recorded, {} recomputed",
                        recorded.leaf_value, replayed.leaf_value
                    ),
                ));
            }
            if replayed.root_after_insertion != recorded.root_after_insertion {
                return Err(mismatch(
                    index,
                    format!(
                        "root {} recorded, {} recomputed",
                        recorded.root_after_insertion, replayed.root_after_insertion
                    ),
                ));
            }
        }

        let replayed_root = session.accumulator.root();
        if replayed_root != self.final_root {
            return Err(mismatch(
                self.participants.len(),
                "final root differs from the last checkpoint".to_string(),
            ));
        }
        Ok(())
    }
}

fn mismatch(participant_index: usize, detail: String) -> CommitmentError {
    CommitmentError::AuditMismatch {
        participant_index,
        detail,
    }
}

/// Sequential state initialization of one channel.
#[derive(Debug)]
pub struct ChannelSession {
    channel_id: ChannelId,
    accumulator: MerkleAccumulator,
    participants: Vec<ParticipantLeaf>,
}

impl ChannelSession {
    /// Start a session with an empty tree of `tree_depth`.
    pub fn new(channel_id: ChannelId, tree_depth: u32) -> Result<Self, CommitmentError> {
        Ok(Self {
            channel_id,
            accumulator: MerkleAccumulator::new(tree_depth)?,
            participants: Vec::new(),
        })
    }

    /// Channel this session initializes.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Read access to the tree.
    pub fn accumulator(&self) -> &MerkleAccumulator {
        &self.accumulator
    }

    /// Bind and insert the next participant.
    pub fn push(&mut self, participant: ChannelParticipant) -> Result<&ParticipantLeaf, CommitmentError> {
        let leaf_value = compute_leaf(
            self.channel_id,
            &participant.address,
            &participant.balance,
            INITIALIZATION_NONCE,
            self.accumulator.root_sequence(),
        )?;
        self.insert_bound(participant, leaf_value)
    }

    fn insert_bound(
        &mut self,
        participant: ChannelParticipant,
        leaf_value: FieldWord,
    ) -> Result<&ParticipantLeaf, CommitmentError> {
        let root_after_insertion = self.accumulator.insert(leaf_value)?;
        let participant_index = self.participants.len();
        tracing::debug!(
            channel_id = self.channel_id.value(),
            participant_index,
            address = %participant.address,
            "participant committed"
        );
        self.participants.push(ParticipantLeaf {
            participant_index,
            address: participant.address,
            balance: participant.balance,
            leaf_value,
            root_after_insertion,
        });
        Ok(&self.participants[participant_index])
    }

    /// Close the session and return the commitment.
    pub fn finalize(self) -> ChannelCommitment {
        let final_root = self.accumulator.root();
        tracing::info!(
            channel_id = self.channel_id.value(),
            participants = self.participants.len(),
            final_root = ?final_root,
            "channel commitment finalized"
        );
        ChannelCommitment {
            channel_id: self.channel_id,
            tree_depth: self.accumulator.depth(),
            participants: self.participants,
            final_root,
        }
    }
}

/// Initialize a channel's state commitment over `participants` in order.
///
/// Leaf values are computed in parallel; insertion is sequential. Fails with
/// `TreeFull` when there are more participants than `4^tree_depth`.
pub fn initialize_channel(
    channel_id: ChannelId,
    participants: &[ChannelParticipant],
    tree_depth: u32,
) -> Result<ChannelCommitment, CommitmentError> {
    let mut session = ChannelSession::new(channel_id, tree_depth)?;
    let capacity = session.accumulator.capacity();
    if participants.len() as u64 > capacity {
        return Err(CommitmentError::TreeFull { capacity });
    }

    let leaves = participants
        .par_iter()
        .map(|p| compute_leaf(channel_id, &p.address, &p.balance, INITIALIZATION_NONCE, &[]))
        .collect::<Result<Vec<_>, _>>()?;

    for (participant, leaf_value) in participants.iter().zip(leaves) {
        session.insert_bound(participant.clone(), leaf_value)?;
    }
    Ok(session.finalize())
}

/// [`initialize_channel`] with the default tree depth.
pub fn initialize_channel_default(
    channel_id: ChannelId,
    participants: &[ChannelParticipant],
) -> Result<ChannelCommitment, CommitmentError> {
    initialize_channel(channel_id, participants, DEFAULT_TREE_DEPTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participants(n: u64) -> Vec<ChannelParticipant> {
        (0..n)
            .map(|i| ChannelParticipant::new(L2Address::from_u64(100 + i), Balance::from(1000 * (i + 1))))
            .collect()
    }

    #[test]
    fn session_and_batch_agree() {
        let ps = participants(6);
        let batch = initialize_channel(ChannelId(3), &ps, 3).unwrap();

        let mut session = ChannelSession::new(ChannelId(3), 3).unwrap();
        for p in &ps {
            session.push(p.clone()).unwrap();
        }
        assert_eq!(session.finalize(), batch);
    }

    #[test]
    fn checkpoint_roots_follow_accumulator() {
        let ps = participants(5);
        let commitment = initialize_channel_default(ChannelId(0), &ps).unwrap();
        let mut acc = MerkleAccumulator::default();
        for leaf in &commitment.participants {
            assert_eq!(acc.insert(leaf.leaf_value).unwrap(), leaf.root_after_insertion);
        }
        assert_eq!(commitment.final_root, acc.root());
        assert_eq!(commitment.root_sequence(), acc.root_sequence());
    }

    #[test]
    fn empty_channel_has_no_root() {
        let commitment = initialize_channel_default(ChannelId(1), &[]).unwrap();
        assert!(commitment.participants.is_empty());
        assert_eq!(commitment.final_root, None);
        commitment.verify().unwrap();
    }

    #[test]
    fn too_many_participants() {
        let err = initialize_channel(ChannelId(0), &participants(5), 1).unwrap_err();
        assert_eq!(err, CommitmentError::TreeFull { capacity: 4 });
    }

    #[test]
    fn session_rejects_overflow() {
        let mut session = ChannelSession::new(ChannelId(0), 1).unwrap();
        for p in participants(4) {
            session.push(p).unwrap();
        }
        let err = session.push(participants(1).remove(0)).unwrap_err();
        assert_eq!(err, CommitmentError::TreeFull { capacity: 4 });
    }

    #[test]
    fn verify_accepts_untampered_trail() {
        let commitment = initialize_channel_default(ChannelId(2), &participants(7)).unwrap();
        commitment.verify().unwrap();
    }

    #[test]
    fn verify_reports_first_tampered_participant() {
        let mut commitment = initialize_channel_default(ChannelId(2), &participants(4)).unwrap();
        commitment.participants[2].balance = Balance::from(1u64);
        let err = commitment.verify().unwrap_err();
        assert!(matches!(
            err,
            CommitmentError::AuditMismatch { participant_index: 2, .. }
        ));
    }

    #[test]
    fn verify_checks_roots_and_final_root() {
        let mut commitment = initialize_channel_default(ChannelId(2), &participants(3)).unwrap();
        commitment.participants[1].root_after_insertion = FieldWord::from_u64(1);
        assert!(matches!(
            commitment.verify(),
            Err(CommitmentError::AuditMismatch { participant_index: 1, .. })
        ));

        let mut commitment = initialize_channel_default(ChannelId(2), &participants(3)).unwrap();
        commitment.final_root = Some(FieldWord::ZERO);
        assert!(matches!(
            commitment.verify(),
            Err(CommitmentError::AuditMismatch { participant_index: 3, .. })
        ));
    }

    #[test]
    fn commitment_json_roundtrip() {
        let commitment = initialize_channel_default(ChannelId(4), &participants(2)).unwrap();
        let json = serde_json::to_string(&commitment).unwrap();
        let back: ChannelCommitment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, commitment);
        back.verify().unwrap();
    }
}

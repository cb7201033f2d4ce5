//! End-to-end channel scenario: channel 0, addresses 13/14/15, balances
//! 1, 2 and 3 ether, inserted in order with nonce 0.

use bridge_core::{Balance, ChannelId, FieldWord, L2Address, ParticipantRegistry};
use bridge_crypto::{hash_four, MerkleAccumulator};
use bridge_state::{
    compute_leaf, initialize_channel_default, ChannelCommitment, ChannelConfig,
    ChannelParticipant, ChannelSession,
};

const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

const LEAVES: [&str; 3] = [
    "0xa0d3c4fb361e3e37ac6870e06e601612a3bf5b0ff780e9152e69cafca2f8000d",
    "0xde81b3524c8b23ac0cb6c3a1b1c1438482517cb90b075593ebdc865edde0000e",
    "0x0ced00872ed6b95de86cd9e8d843ef5ae72a379c14de26e0afed047e061c000f",
];

const ROOTS: [&str; 3] = [
    "0xa0d3c4fb361e3e37ac6870e06e601612a3bf5b0ff780e9152e69cafca2f8000d",
    "0x4937db2758d78309baf1678f5e3c8c3079cc836f6acff68cd4683b4f042dda88",
    "0x7275847c9cb7289b001bdcbed7204c844e028a8f28ec197378bb793dcf5ed102",
];

fn word(hex: &str) -> FieldWord {
    FieldWord::from_hex(hex).unwrap()
}

fn scenario() -> Vec<ChannelParticipant> {
    (0..3u64)
        .map(|i| {
            ChannelParticipant::new(
                L2Address::from_u64(13 + i),
                Balance::from((i as u128 + 1) * WEI_PER_ETH),
            )
        })
        .collect()
}

fn golden_commitment() -> ChannelCommitment {
    initialize_channel_default(ChannelId(0), &scenario()).unwrap()
}

#[test]
fn leaf_values_match_recorded_vectors() {
    let commitment = golden_commitment();
    for (leaf, expected) in commitment.participants.iter().zip(LEAVES) {
        assert_eq!(leaf.leaf_value, word(expected));
    }
}

#[test]
fn checkpoint_roots_match_recorded_vectors() {
    let commitment = golden_commitment();
    for (leaf, expected) in commitment.participants.iter().zip(ROOTS) {
        assert_eq!(leaf.root_after_insertion, word(expected));
    }
    assert_eq!(commitment.final_root, Some(word(ROOTS[2])));
}

#[test]
fn roots_follow_from_the_tree_rule() {
    let leaves: Vec<FieldWord> = LEAVES.iter().map(|h| word(h)).collect();
    assert_eq!(
        word(ROOTS[1]),
        hash_four(&[leaves[0], leaves[1], FieldWord::ZERO, FieldWord::ZERO])
    );
    assert_eq!(
        word(ROOTS[2]),
        hash_four(&[leaves[0], leaves[1], leaves[2], FieldWord::ZERO])
    );
}

#[test]
fn accumulator_cache_after_scenario() {
    let mut acc = MerkleAccumulator::default();
    for leaf in LEAVES {
        acc.insert(word(leaf)).unwrap();
    }
    // No group of four is complete yet.
    for level in 0..3 {
        assert_eq!(acc.cached_subtree(level), Some(FieldWord::ZERO));
    }
    assert_eq!(acc.next_leaf_index(), 3);
}

#[test]
fn every_balance_reaches_the_final_root() {
    let mut changed = scenario();
    changed[1].balance = Balance::from(999_999u64);
    let other = initialize_channel_default(ChannelId(0), &changed).unwrap();
    assert_ne!(other.final_root, golden_commitment().final_root);
    assert_eq!(other.participants[0].root_after_insertion, word(ROOTS[0]));
}

#[test]
fn every_leaf_is_bound_to_the_channel_id() {
    // The nonce stays 0, so each leaf is independent of the roots before it.
    for (i, p) in scenario().iter().enumerate() {
        let leaf = compute_leaf(ChannelId(0), &p.address, &p.balance, 0, &[]).unwrap();
        assert_eq!(leaf, word(LEAVES[i]));
    }
}

#[test]
fn sequential_session_reproduces_the_scenario() {
    let mut session = ChannelSession::new(ChannelId(0), 3).unwrap();
    for p in scenario() {
        session.push(p).unwrap();
    }
    assert_eq!(session.finalize(), golden_commitment());
}

#[test]
fn recorded_trail_replays() {
    golden_commitment().verify().unwrap();
}

#[test]
fn yaml_config_reproduces_the_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("channel.yaml");
    std::fs::write(
        &path,
        r#"
channel_id: 0
tree_depth: 3
participants:
  - address: "0x000000000000000000000000000000000000000d"
    balance: "1000000000000000000"
  - address: "0x0e"
    balance: "2000000000000000000"
  - address: "0f"
    balance: "3000000000000000000"
"#,
    )
    .unwrap();

    let config = ChannelConfig::load(&path).unwrap();
    let commitment = config.initialize(&mut ParticipantRegistry::new()).unwrap();
    assert_eq!(commitment, golden_commitment());
}

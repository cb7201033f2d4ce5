//! # LeafBinder — Binding an Account to Tree History
//!
//! ```text
//! prev_root = nonce == 0 ? pad32(channel_id) : root_sequence[nonce - 1]
//! gamma     = keccak256(prev_root || pad32(address))
//! leaf      = (address + gamma * balance) mod 2^256
//! ```
//!
//! The arithmetic wraps like fixed-width 256-bit unsigned integers: an
//! overflowing product is truncated to its low 256 bits, never saturated and
//! never reported as an error.

use bridge_core::{Balance, ChannelId, CommitmentError, FieldWord, L2Address};
use bridge_crypto::keccak::keccak256_concat;
use num_bigint::BigUint;

/// Nonce used for every participant during channel initialization.
///
/// Leaf binding is keyed on the channel id for all participants; only the
/// accumulator's own state carries history between insertions.
pub const INITIALIZATION_NONCE: usize = 0;

/// The word a leaf is bound to.
pub fn previous_root(
    channel_id: ChannelId,
    nonce: usize,
    root_sequence: &[FieldWord],
) -> Result<FieldWord, CommitmentError> {
    if nonce == 0 {
        return Ok(channel_id.to_word());
    }
    root_sequence
        .get(nonce - 1)
        .copied()
        .ok_or(CommitmentError::InvalidRootSequenceAccess {
            nonce,
            available: root_sequence.len(),
        })
}

/// Compute the leaf value for one account.
pub fn compute_leaf(
    channel_id: ChannelId,
    address: &L2Address,
    balance: &Balance,
    nonce: usize,
    root_sequence: &[FieldWord],
) -> Result<FieldWord, CommitmentError> {
    let prev_root = previous_root(channel_id, nonce, root_sequence)?;
    let address_word = address.to_word();
    let gamma = keccak256_concat([prev_root.as_bytes().as_slice(), address_word.as_bytes().as_slice()]);

    let modulus: BigUint = BigUint::from(1u8) << 256;
    let value: BigUint =
        (to_uint(&address_word) + to_uint(&gamma) * balance.as_biguint()) % modulus;
    FieldWord::left_pad(&value.to_bytes_be())
}

fn to_uint(word: &FieldWord) -> BigUint {
    BigUint::from_bytes_be(word.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_crypto::keccak256;
    use proptest::prelude::*;

    fn eth(n: u64) -> Balance {
        Balance::from(n as u128 * 1_000_000_000_000_000_000)
    }

    #[test]
    fn golden_first_leaf() {
        let leaf = compute_leaf(ChannelId(0), &L2Address::from_u64(13), &eth(1), 0, &[]).unwrap();
        assert_eq!(
            leaf.to_hex(),
            "0xa0d3c4fb361e3e37ac6870e06e601612a3bf5b0ff780e9152e69cafca2f8000d"
        );
    }

    #[test]
    fn zero_balance_leaf_is_the_address() {
        let addr = L2Address::from_u64(0xbeef);
        let leaf = compute_leaf(ChannelId(9), &addr, &Balance::zero(), 0, &[]).unwrap();
        assert_eq!(leaf, addr.to_word());
    }

    #[test]
    fn nonce_zero_binds_to_channel_id() {
        let addr = L2Address::from_u64(13);
        let roots = [FieldWord::from_u64(99)];
        let a = compute_leaf(ChannelId(5), &addr, &eth(1), 0, &[]).unwrap();
        let b = compute_leaf(ChannelId(5), &addr, &eth(1), 0, &roots).unwrap();
        assert_eq!(a, b);
        let c = compute_leaf(ChannelId(6), &addr, &eth(1), 0, &[]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn positive_nonce_reads_root_sequence() {
        let roots = [FieldWord::from_u64(7), FieldWord::from_u64(8)];
        assert_eq!(previous_root(ChannelId(0), 2, &roots).unwrap(), roots[1]);
        // nonce 1 with channel id 7 coincides with roots[0] = 7.
        let addr = L2Address::from_u64(1);
        let bound = compute_leaf(ChannelId(0), &addr, &eth(1), 1, &roots).unwrap();
        let direct = compute_leaf(ChannelId(7), &addr, &eth(1), 0, &[]).unwrap();
        assert_eq!(bound, direct);
    }

    #[test]
    fn nonce_beyond_sequence_is_rejected() {
        let err = compute_leaf(
            ChannelId(0),
            &L2Address::from_u64(1),
            &eth(1),
            3,
            &[FieldWord::ZERO, FieldWord::ZERO],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CommitmentError::InvalidRootSequenceAccess {
                nonce: 3,
                available: 2
            }
        );
    }

    #[test]
    fn overflow_wraps_to_low_bits() {
        let addr = L2Address::new([0xff; 20]);
        let max = Balance::new((BigUint::from(1u8) << 256) - 1u8).unwrap();
        let leaf = compute_leaf(ChannelId(1), &addr, &max, 0, &[]).unwrap();

        let mut input = ChannelId(1).to_word().as_bytes().to_vec();
        input.extend_from_slice(addr.to_word().as_bytes());
        let gamma = to_uint(&keccak256(&input));
        let modulus: BigUint = BigUint::from(1u8) << 256;
        // address + gamma * (2^256 - 1) == address - gamma (mod 2^256)
        let expected = (to_uint(&addr.to_word()) + &modulus - gamma) % &modulus;
        assert_eq!(to_uint(&leaf), expected);
    }

    proptest! {
        #[test]
        fn leaf_is_always_a_word(addr in any::<u64>(), balance in any::<u128>(), channel in any::<u64>()) {
            let leaf = compute_leaf(
                ChannelId(channel),
                &L2Address::from_u64(addr),
                &Balance::from(balance),
                0,
                &[],
            );
            prop_assert!(leaf.is_ok());
        }
    }
}

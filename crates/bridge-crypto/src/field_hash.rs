//! # FieldHash — Folding Bytes into One Field Word
//!
//! `fold()` reduces an arbitrary-length message to a single 32-byte digest
//! with the arity-2 Poseidon compression.
//!
//! ## Algorithm
//!
//! 1. Empty input hashes the all-zero pair `H2(0, 0)`. This constant is not
//!    the zero word.
//! 2. The message is cut into 32-byte big-endian words. The last word is the
//!    short tail of the buffer read as an integer, not right-padded.
//! 3. Each folding round pads the word list to a multiple of the arity. When
//!    that padded length is also a multiple of `arity^2`, the round groups
//!    words by four and applies `H4(a, b, c, d) = H2(H2(a, b), H2(c, d))`;
//!    otherwise it groups by two and applies `H2`. Missing tail slots are
//!    zero.
//! 4. Rounds repeat until one word remains. A single-word message still goes
//!    through one round, paired with zero.
//!
//! Words are reduced modulo the BLS12-381 scalar field order on entry.
//! The 4-to-1 shortcut and its divisibility check are part of the reference
//! digest and must not be simplified.

use ark_bls12_381::Fr;
use ark_ff::{PrimeField, Zero};
use bridge_core::FieldWord;

use crate::field::{field_to_word, word_to_field};
use crate::poseidon::compress;

/// Inputs per compression call.
pub const ARITY: usize = 2;

fn compress4(a: Fr, b: Fr, c: Fr, d: Fr) -> Fr {
    compress(compress(a, b), compress(c, d))
}

fn fold_round(words: &[Fr]) -> Vec<Fr> {
    let padded = words.len().div_ceil(ARITY) * ARITY;
    let group = if padded % (ARITY * ARITY) == 0 {
        ARITY * ARITY
    } else {
        ARITY
    };

    words
        .chunks(group)
        .map(|chunk| {
            let mut slots = [Fr::zero(); ARITY * ARITY];
            slots[..chunk.len()].copy_from_slice(chunk);
            if group == ARITY {
                compress(slots[0], slots[1])
            } else {
                compress4(slots[0], slots[1], slots[2], slots[3])
            }
        })
        .collect()
}

/// Fold a message into one 32-byte digest.
pub fn fold(message: &[u8]) -> FieldWord {
    if message.is_empty() {
        return empty_digest();
    }

    let mut words: Vec<Fr> = message.chunks(32).map(Fr::from_be_bytes_mod_order).collect();
    loop {
        words = fold_round(&words);
        if words.len() == 1 {
            break;
        }
    }
    field_to_word(&words[0])
}

/// The digest of the empty message, `H2(0, 0)`.
pub fn empty_digest() -> FieldWord {
    field_to_word(&compress(Fr::zero(), Fr::zero()))
}

/// `H2(a, b)` over words.
pub fn hash_two(a: &FieldWord, b: &FieldWord) -> FieldWord {
    field_to_word(&compress(word_to_field(a), word_to_field(b)))
}

/// `H4` over four words: the 4-to-1 reduction used by folding and by the
/// Merkle accumulator's parent nodes.
pub fn hash_four(children: &[FieldWord; 4]) -> FieldWord {
    let [a, b, c, d] = children.map(|w| word_to_field::<Fr>(&w));
    field_to_word(&compress4(a, b, c, d))
}

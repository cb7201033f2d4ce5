//! Conversions between 32-byte words and prime-field elements.

use ark_ff::{BigInt, BigInteger, PrimeField};
use bridge_core::FieldWord;

/// The 256-bit integer held by a word, as little-endian limbs.
pub fn word_to_bigint(word: &FieldWord) -> BigInt<4> {
    let bytes = word.as_bytes();
    let mut limbs = [0u64; 4];
    for (i, limb) in limbs.iter_mut().enumerate() {
        let start = 32 - 8 * (i + 1);
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&bytes[start..start + 8]);
        *limb = u64::from_be_bytes(chunk);
    }
    BigInt::new(limbs)
}

/// Interpret a word as an integer and reduce it modulo the field order.
pub fn word_to_field<F: PrimeField>(word: &FieldWord) -> F {
    F::from_be_bytes_mod_order(word.as_bytes())
}

/// Big-endian, left-zero-padded encoding of a field element.
pub fn field_to_word<F: PrimeField>(element: &F) -> FieldWord {
    let bytes = element.into_bigint().to_bytes_be();
    let mut out = [0u8; 32];
    let take = bytes.len().min(32);
    out[32 - take..].copy_from_slice(&bytes[bytes.len() - take..]);
    FieldWord::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ff::{One, Zero};

    #[test]
    fn small_values_roundtrip() {
        let w = FieldWord::from_u64(123_456_789);
        let f: Fr = word_to_field(&w);
        assert_eq!(f, Fr::from(123_456_789u64));
        assert_eq!(field_to_word(&f), w);
    }

    #[test]
    fn words_above_modulus_are_reduced() {
        // p = 0x73ed...0001, so p + 1 reduces to 1.
        let p_plus_one = FieldWord::from_hex(
            "0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000002",
        )
        .unwrap();
        let f: Fr = word_to_field(&p_plus_one);
        assert!(f.is_one());
        let p = FieldWord::from_hex(
            "0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001",
        )
        .unwrap();
        assert!(word_to_field::<Fr>(&p).is_zero());
    }

    #[test]
    fn bigint_limbs_are_little_endian() {
        let w = FieldWord::from_u64(0x0102_0304_0506_0708);
        let b = word_to_bigint(&w);
        assert_eq!(b.0, [0x0102_0304_0506_0708, 0, 0, 0]);
    }
}

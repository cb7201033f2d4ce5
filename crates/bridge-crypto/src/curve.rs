//! # CurveIdentity — Deterministic L2 Keys on Jubjub
//!
//! Derives an L2 key pair and address from a participant's L1 public key,
//! the channel id, and a label:
//!
//! ```text
//! seed    = "0x" || hex(l1_public_key) || decimal(channel_id) || label
//! sk      = keccak256(seed) mod l            (1 if the reduction is 0)
//! pk      = G * sk                           (Jubjub, affine x || y)
//! address = low 20 bytes of fold(pk)
//! ```
//!
//! `l` is the prime subgroup order. The derivation is a pure function of its
//! inputs: the same triple always yields the same key and address.
//!
//! ## Security Invariant
//!
//! The private scalar is only ever exposed through `CurveKeyPair::private_key`
//! and `DerivedIdentity::private_key`. Neither `Debug` implementation prints
//! it, and no log event carries it.

use ark_ec::twisted_edwards::TECurveConfig;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bls12_381::{EdwardsAffine, EdwardsConfig, Fq, Fr};
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use bridge_core::{CommitmentError, FieldWord, L2Address, PointEncoding, SeedMaterial};
use rayon::prelude::*;

use crate::field::{field_to_word, word_to_bigint, word_to_field};
use crate::field_hash::fold;
use crate::keccak::keccak256;

// ---------------------------------------------------------------------------
// Key pair
// ---------------------------------------------------------------------------

/// A Jubjub scalar and its public point.
#[derive(Clone, PartialEq, Eq)]
pub struct CurveKeyPair {
    secret: Fr,
    public: EdwardsAffine,
}

impl CurveKeyPair {
    /// Derive the key pair for one seed triple.
    pub fn derive(seed: &SeedMaterial) -> Self {
        let digest = keccak256(seed.seed_string().as_bytes());
        let mut secret: Fr = word_to_field(&digest);
        if secret.is_zero() {
            secret = Fr::one();
        }
        Self::from_scalar(secret)
    }

    /// Accept an externally held private key. It must satisfy `0 < sk < l`.
    pub fn from_private_key(private_key: &FieldWord) -> Result<Self, CommitmentError> {
        let secret = Fr::from_bigint(word_to_bigint(private_key)).ok_or_else(|| {
            CommitmentError::InvalidInputEncoding(
                "private key is not below the subgroup order".to_string(),
            )
        })?;
        if secret.is_zero() {
            return Err(CommitmentError::InvalidInputEncoding(
                "private key must be non-zero".to_string(),
            ));
        }
        Ok(Self::from_scalar(secret))
    }

    fn from_scalar(secret: Fr) -> Self {
        let public = (EdwardsAffine::generator() * secret).into_affine();
        Self { secret, public }
    }

    /// The private scalar as a big-endian word.
    pub fn private_key(&self) -> FieldWord {
        field_to_word(&self.secret)
    }

    /// The public point.
    pub fn public_point(&self) -> &EdwardsAffine {
        &self.public
    }

    /// Uncompressed encoding: big-endian `x || y`.
    pub fn public_affine_bytes(&self) -> [u8; 64] {
        affine_bytes(&self.public)
    }

    /// 32-byte compressed encoding of the public point.
    pub fn public_compressed(&self) -> [u8; 32] {
        compress_point(&self.public)
    }

    /// The L2 address bound to this key.
    pub fn address(&self) -> L2Address {
        L2Address::from_word_low(&fold(&self.public_affine_bytes()))
    }
}

impl std::fmt::Debug for CurveKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CurveKeyPair(<private>, address={})", self.address())
    }
}

/// Result of one identity derivation.
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
    /// Private scalar, big-endian.
    pub private_key: FieldWord,
    /// L2 address of the public point.
    pub address: L2Address,
}

impl std::fmt::Debug for DerivedIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedIdentity")
            .field("private_key", &"<private>")
            .field("address", &self.address)
            .finish()
    }
}

impl From<&CurveKeyPair> for DerivedIdentity {
    fn from(pair: &CurveKeyPair) -> Self {
        Self {
            private_key: pair.private_key(),
            address: pair.address(),
        }
    }
}

// ---------------------------------------------------------------------------
// Derivation entry points
// ---------------------------------------------------------------------------

/// Derive the L2 identity for `(l1_public_key_hex, channel_id, label)`.
///
/// Fails with `InvalidInputEncoding` if the public key is not valid hex.
pub fn derive(
    l1_public_key_hex: &str,
    channel_id: u64,
    label: &str,
) -> Result<DerivedIdentity, CommitmentError> {
    let seed = SeedMaterial::from_hex(l1_public_key_hex, channel_id, label)?;
    Ok(derive_from_seed(&seed))
}

/// Derive from already validated seed material.
pub fn derive_from_seed(seed: &SeedMaterial) -> DerivedIdentity {
    let pair = CurveKeyPair::derive(seed);
    let identity = DerivedIdentity::from(&pair);
    tracing::debug!(
        channel_id = seed.channel_id.value(),
        label = %seed.label,
        address = %identity.address,
        "derived L2 identity"
    );
    identity
}

/// Derive many identities in parallel. Output order matches input order.
pub fn derive_batch(seeds: &[SeedMaterial]) -> Vec<DerivedIdentity> {
    seeds.par_iter().map(derive_from_seed).collect()
}

// ---------------------------------------------------------------------------
// Point encodings
// ---------------------------------------------------------------------------

fn affine_bytes(point: &EdwardsAffine) -> [u8; 64] {
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(field_to_word(&point.x).as_bytes());
    out[32..].copy_from_slice(field_to_word(&point.y).as_bytes());
    out
}

fn compress_point(point: &EdwardsAffine) -> [u8; 32] {
    let mut out = field_to_word(&point.y).into_bytes();
    out.reverse();
    if point.x.into_bigint().is_odd() {
        out[31] |= 0x80;
    }
    out
}

/// Decode a 32-byte compressed point.
///
/// Recovers `x` from `x^2 = (y^2 - 1) / (d*y^2 - a)`. Only membership on the
/// curve is checked, not membership in the prime-order subgroup.
pub fn decompress_point(bytes: &[u8; 32]) -> Result<EdwardsAffine, CommitmentError> {
    let x_odd = bytes[31] & 0x80 != 0;
    let mut be = *bytes;
    be[31] &= 0x7f;
    be.reverse();

    let y = Fq::from_bigint(word_to_bigint(&FieldWord::new(be))).ok_or_else(|| {
        CommitmentError::InvalidPointEncoding("y coordinate is not canonical".to_string())
    })?;

    let y2 = y.square();
    let numerator = y2 - Fq::one();
    let denominator = EdwardsConfig::COEFF_D * y2 - EdwardsConfig::COEFF_A;
    let x2 = denominator
        .inverse()
        .map(|inv| numerator * inv)
        .ok_or_else(|| CommitmentError::InvalidPointEncoding("degenerate y coordinate".to_string()))?;
    let mut x = x2.sqrt().ok_or_else(|| {
        CommitmentError::InvalidPointEncoding("no curve point with this y coordinate".to_string())
    })?;

    if x.is_zero() && x_odd {
        return Err(CommitmentError::InvalidPointEncoding(
            "sign bit set for x = 0".to_string(),
        ));
    }
    if x.into_bigint().is_odd() != x_odd {
        x = -x;
    }

    let point = EdwardsAffine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(CommitmentError::InvalidPointEncoding(
            "decoded point is not on the curve".to_string(),
        ));
    }
    Ok(point)
}

/// The L2 address of an externally supplied public point.
///
/// Compressed points are decoded and re-encoded as affine `x || y` first.
/// Affine bytes are folded as given.
pub fn address_from_point(point: &PointEncoding) -> Result<L2Address, CommitmentError> {
    let digest = match point {
        PointEncoding::Compressed(bytes) => fold(&affine_bytes(&decompress_point(bytes)?)),
        PointEncoding::Affine(bytes) => fold(bytes),
    };
    Ok(L2Address::from_word_low(&digest))
}

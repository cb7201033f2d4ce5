//! # Derive Subcommand
//!
//! Deterministic L2 identity from a layer-1 public key, channel id, and
//! label. The private key is only printed with `--reveal-private-key`.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use bridge_core::{FieldWord, L2Address, SeedMaterial};
use bridge_crypto::CurveKeyPair;

/// Arguments for `bridge derive`.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    /// Layer-1 public key, hex (the `0x` prefix is optional).
    #[arg(long)]
    pub l1_public_key: String,

    /// Channel the identity is scoped to.
    #[arg(long)]
    pub channel_id: u64,

    /// Participant label.
    #[arg(long)]
    pub label: String,

    /// Include the private scalar in the output.
    #[arg(long)]
    pub reveal_private_key: bool,
}

/// JSON output of `bridge derive`.
#[derive(Debug, Serialize)]
pub struct DeriveOutput {
    /// Derived L2 address.
    pub address: L2Address,
    /// Compressed public point, hex.
    pub public_key_compressed: String,
    /// Affine `x || y` public point, hex.
    pub public_key_affine: String,
    /// Private scalar, present only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<FieldWord>,
}

/// Compute the output without printing it.
pub fn derive_identity(args: &DeriveArgs) -> Result<DeriveOutput> {
    let seed = SeedMaterial::from_hex(&args.l1_public_key, args.channel_id, &args.label)
        .context("invalid --l1-public-key")?;
    let pair = CurveKeyPair::derive(&seed);
    tracing::info!(channel_id = args.channel_id, label = %args.label, "derived identity");
    Ok(DeriveOutput {
        address: pair.address(),
        public_key_compressed: format!("0x{}", hex::encode(pair.public_compressed())),
        public_key_affine: format!("0x{}", hex::encode(pair.public_affine_bytes())),
        private_key: args.reveal_private_key.then(|| pair.private_key()),
    })
}

/// Execute `bridge derive`.
pub fn run_derive(args: &DeriveArgs) -> Result<u8> {
    crate::print_json(&derive_identity(args)?)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(reveal: bool) -> DeriveArgs {
        DeriveArgs {
            l1_public_key: format!("0x04{}", "11".repeat(64)),
            channel_id: 7,
            label: "alice".to_string(),
            reveal_private_key: reveal,
        }
    }

    #[test]
    fn private_key_hidden_by_default() {
        let out = derive_identity(&args(false)).unwrap();
        assert_eq!(out.address.to_hex(), "0x51f91957fc72bdd5f8c146cac621a5ffb6237741");
        let json = serde_json::to_value(&out).unwrap();
        assert!(json.get("private_key").is_none());
    }

    #[test]
    fn private_key_revealed_on_request() {
        let out = derive_identity(&args(true)).unwrap();
        assert_eq!(
            out.private_key.unwrap().to_hex(),
            "0x0618971b2f38ed90edbb7a6e5ab6458239f3ea89558eeb72b97b55d82e217b27"
        );
        assert_eq!(
            out.public_key_compressed,
            "0x225a6e5c95c7440d3738784a5b22873654ba175ee64f18f71447f4e22fc112a8"
        );
    }

    #[test]
    fn malformed_key_is_an_error() {
        let mut bad = args(false);
        bad.l1_public_key = "0xnothex".to_string();
        assert!(derive_identity(&bad).is_err());
    }
}

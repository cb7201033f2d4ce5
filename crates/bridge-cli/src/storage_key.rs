//! # Storage-Key Subcommand
//!
//! Each `--part` is either `0x`-prefixed hex (a word, left-padded) or a
//! decimal integer. Parts are hashed in the order given.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;

use bridge_core::{FieldWord, StorageKeyPart, StorageLayer};
use bridge_crypto::storage_key::derive_storage_key_str;

/// Arguments for `bridge storage-key`.
#[derive(Args, Debug)]
pub struct StorageKeyArgs {
    /// Key part: `0x`-prefixed hex or a decimal integer. Repeatable.
    #[arg(long = "part", required = true)]
    pub parts: Vec<String>,

    /// Ledger layer: `L1` (Keccak-256) or `L2` (FieldHash).
    #[arg(long)]
    pub layer: String,
}

/// JSON output of `bridge storage-key`.
#[derive(Debug, Serialize)]
pub struct StorageKeyOutput {
    /// Layer the key was derived for.
    pub layer: StorageLayer,
    /// Derived storage key.
    pub key: FieldWord,
}

/// Parse one `--part` value.
pub fn parse_part(raw: &str) -> Result<StorageKeyPart> {
    if raw.starts_with("0x") || raw.starts_with("0X") {
        let bytes = bridge_core::word::decode_hex(raw)?;
        return Ok(StorageKeyPart::Word(FieldWord::left_pad(&bytes)?));
    }
    let value = bridge_core::Balance::from_decimal(raw)
        .map_err(|_| anyhow!("part {raw:?} is neither 0x-hex nor a decimal integer"))?;
    Ok(StorageKeyPart::Uint(value.as_biguint().clone()))
}

/// Compute the output without printing it.
pub fn storage_key(args: &StorageKeyArgs) -> Result<StorageKeyOutput> {
    let parts = args
        .parts
        .iter()
        .map(|p| parse_part(p))
        .collect::<Result<Vec<_>>>()?;
    let key = derive_storage_key_str(&parts, &args.layer).context("storage key derivation failed")?;
    let layer = args.layer.parse()?;
    Ok(StorageKeyOutput { layer, key })
}

/// Execute `bridge storage-key`.
pub fn run_storage_key(args: &StorageKeyArgs) -> Result<u8> {
    crate::print_json(&storage_key(args)?)?;
    Ok(0)
}

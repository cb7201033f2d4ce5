//! # Hash Subcommand
//!
//! FieldHash digest of a hex byte string (the empty message when omitted).

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use bridge_core::FieldWord;
use bridge_crypto::fold;

/// Arguments for `bridge hash`.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Message bytes as hex. Omit to hash the empty message.
    #[arg(long)]
    pub hex: Option<String>,
}

/// JSON output of `bridge hash`.
#[derive(Debug, Serialize)]
pub struct HashOutput {
    /// Message length in bytes.
    pub length: usize,
    /// FieldHash digest.
    pub digest: FieldWord,
}

/// Compute the output without printing it.
pub fn hash_message(args: &HashArgs) -> Result<HashOutput> {
    let message = match &args.hex {
        Some(raw) => bridge_core::word::decode_hex(raw).context("invalid --hex")?,
        None => Vec::new(),
    };
    Ok(HashOutput {
        length: message.len(),
        digest: fold(&message),
    })
}

/// Execute `bridge hash`.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    crate::print_json(&hash_message(args)?)?;
    Ok(0)
}

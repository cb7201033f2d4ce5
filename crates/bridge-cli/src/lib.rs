//! # bridge-cli — Command-Line Front End
//!
//! Thin wrappers over the library crates. Every subcommand prints one JSON
//! document to stdout and returns an exit code; failures propagate as
//! `anyhow::Error` to `main`, which logs them and exits with status 1.
//!
//! ```bash
//! bridge derive --l1-public-key 0x04ab... --channel-id 0 --label alice
//! bridge storage-key --part 0x0d --part 0 --layer L2
//! bridge hash --hex 616263
//! bridge channel init channel.yaml --output commitment.json
//! bridge channel verify commitment.json
//! ```

pub mod channel;
pub mod derive;
pub mod hash;
pub mod storage_key;

use anyhow::{Context, Result};
use serde::Serialize;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}

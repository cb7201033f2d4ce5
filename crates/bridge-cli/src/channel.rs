//! # Channel Subcommand
//!
//! - `init` — run state initialization for a YAML channel definition and
//!   emit the `ChannelCommitment` (audit trail and final root) as JSON.
//! - `verify` — replay a previously emitted commitment.
//!
//! A failed computation never writes or prints a partial commitment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use bridge_core::{ChannelId, FieldWord, ParticipantRegistry};
use bridge_state::{ChannelCommitment, ChannelConfig};

/// Arguments for `bridge channel`.
#[derive(Args, Debug)]
pub struct ChannelArgs {
    #[command(subcommand)]
    pub command: ChannelCommand,
}

/// Channel subcommands.
#[derive(Subcommand, Debug)]
pub enum ChannelCommand {
    /// Compute a channel's state commitment from a YAML definition.
    Init {
        /// Path to the channel YAML file.
        config: PathBuf,
        /// Write the commitment here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replay a commitment JSON file and check every leaf and root.
    Verify {
        /// Path to the commitment JSON file.
        commitment: PathBuf,
    },
}

/// JSON output of `bridge channel verify`.
#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    /// Channel id of the replayed commitment.
    pub channel_id: ChannelId,
    /// Number of participants replayed.
    pub participants: usize,
    /// Confirmed final root.
    pub final_root: Option<FieldWord>,
    /// Always true; a mismatch is reported as an error.
    pub valid: bool,
}

/// Load a channel definition and compute its commitment.
pub fn init_channel(config_path: &Path) -> Result<ChannelCommitment> {
    let config = ChannelConfig::load(config_path)
        .with_context(|| format!("failed to load channel config {}", config_path.display()))?;
    let mut registry = ParticipantRegistry::new();
    let commitment = config
        .initialize(&mut registry)
        .with_context(|| format!("channel {} initialization failed", config.channel_id))?;
    tracing::debug!(registered_keys = registry.len(), "layer-1 keys registered");
    Ok(commitment)
}

/// Read and replay a commitment file.
pub fn verify_commitment(path: &Path) -> Result<VerifyOutput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let commitment: ChannelCommitment = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a channel commitment", path.display()))?;
    commitment
        .verify()
        .with_context(|| format!("commitment for channel {} failed replay", commitment.channel_id))?;
    Ok(VerifyOutput {
        channel_id: commitment.channel_id,
        participants: commitment.participants.len(),
        final_root: commitment.final_root,
        valid: true,
    })
}

/// Execute `bridge channel`.
pub fn run_channel(args: &ChannelArgs) -> Result<u8> {
    match &args.command {
        ChannelCommand::Init { config, output } => {
            let commitment = init_channel(config)?;
            match output {
                Some(path) => {
                    let rendered = serde_json::to_string_pretty(&commitment)
                        .context("failed to render commitment")?;
                    std::fs::write(path, rendered)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "commitment written");
                }
                None => crate::print_json(&commitment)?,
            }
            Ok(0)
        }
        ChannelCommand::Verify { commitment } => {
            crate::print_json(&verify_commitment(commitment)?)?;
            Ok(0)
        }
    }
}

//! # bridge CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bridge_cli::channel::{run_channel, ChannelArgs};
use bridge_cli::derive::{run_derive, DeriveArgs};
use bridge_cli::hash::{run_hash, HashArgs};
use bridge_cli::storage_key::{run_storage_key, StorageKeyArgs};

/// Layer-2 channel commitment toolkit.
///
/// Derives L2 identities and storage keys, hashes messages with FieldHash,
/// and computes or replays channel state commitments. All output is JSON.
#[derive(Parser, Debug)]
#[command(name = "bridge", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log events as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the L2 key and address for a layer-1 public key.
    Derive(DeriveArgs),

    /// Derive an L1 or L2 storage key from word-aligned parts.
    StorageKey(StorageKeyArgs),

    /// FieldHash digest of a byte string.
    Hash(HashArgs),

    /// Channel state initialization and replay.
    Channel(ChannelArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("bridge CLI starting");

    let result = match &cli.command {
        Commands::Derive(args) => run_derive(args),
        Commands::StorageKey(args) => run_storage_key(args),
        Commands::Hash(args) => run_hash(args),
        Commands::Channel(args) => run_channel(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_cli::channel::ChannelCommand;

    #[test]
    fn cli_parse_derive() {
        let cli = Cli::try_parse_from([
            "bridge",
            "derive",
            "--l1-public-key",
            "0x04ab",
            "--channel-id",
            "3",
            "--label",
            "alice",
        ])
        .unwrap();
        match cli.command {
            Commands::Derive(args) => {
                assert_eq!(args.channel_id, 3);
                assert_eq!(args.label, "alice");
                assert!(!args.reveal_private_key);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_derive_requires_channel() {
        let result = Cli::try_parse_from([
            "bridge",
            "derive",
            "--l1-public-key",
            "0x04ab",
            "--label",
            "alice",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_storage_key_repeated_parts() {
        let cli = Cli::try_parse_from([
            "bridge",
            "storage-key",
            "--part",
            "0x0d",
            "--part",
            "0",
            "--layer",
            "L2",
        ])
        .unwrap();
        match cli.command {
            Commands::StorageKey(args) => {
                assert_eq!(args.parts, vec!["0x0d", "0"]);
                assert_eq!(args.layer, "L2");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_hash_without_input() {
        let cli = Cli::try_parse_from(["bridge", "hash"]).unwrap();
        assert!(matches!(cli.command, Commands::Hash(HashArgs { hex: None })));
    }

    #[test]
    fn cli_parse_channel_init_with_output() {
        let cli = Cli::try_parse_from([
            "bridge",
            "-vv",
            "channel",
            "init",
            "channel.yaml",
            "--output",
            "out.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Channel(ChannelArgs {
                command: ChannelCommand::Init { config, output },
            }) => {
                assert_eq!(config.to_str(), Some("channel.yaml"));
                assert_eq!(output.as_deref().and_then(|p| p.to_str()), Some("out.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_global_log_json() {
        let cli = Cli::try_parse_from(["bridge", "channel", "verify", "c.json", "--log-json"]).unwrap();
        assert!(cli.log_json);
    }
}

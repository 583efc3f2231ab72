//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Config file location (default `subsync.toml`)
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::config::Overrides;

/// subsync - replay monorepo subtree history into per-component mirrors
#[derive(Parser, Debug)]
#[command(name = "subsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to load (missing file falls back to defaults)
    #[arg(long, global = true, default_value = "subsync.toml")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Settings every command accepts, overriding the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to the monorepo working copy
    #[arg(long)]
    pub monorepo: Option<PathBuf>,

    /// Root directory containing the mirror working copies
    #[arg(long)]
    pub mirrors: Option<PathBuf>,

    /// Ref the replayed commit range starts from (exclusive)
    #[arg(long)]
    pub from_tag: Option<String>,

    /// Destination tag to stamp on every mirror
    #[arg(long)]
    pub to_tag: Option<String>,

    /// Remote to fetch from and publish to
    #[arg(long)]
    pub remote: Option<String>,

    /// Primary branch of the mirrors
    #[arg(long)]
    pub branch: Option<String>,
}

impl From<ConfigArgs> for Overrides {
    fn from(args: ConfigArgs) -> Self {
        Overrides {
            monorepo: args.monorepo,
            mirrors: args.mirrors,
            from_tag: args.from_tag,
            to_tag: args.to_tag,
            remote: args.remote,
            branch: args.branch,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Synchronize every mirror: replay, tag, verify, publish
    #[command(
        long_about = "Synchronize every mirror with the monorepo.\n\n\
            Discovers mirror working copies under the mirrors root, replays \
            the monorepo commit range into each one commit-by-commit with \
            original timestamps, stamps the destination tag, verifies that \
            each tagged mirror is byte-identical to its monorepo subtree, \
            and pushes branch and tag. Mirrors already carrying the \
            destination tag are skipped, so re-runs are cheap."
    )]
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Stop after verification; do not push anything
        #[arg(long)]
        skip_publish: bool,
    },

    /// List discovered components without touching anything
    Components {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

//! CLI definitions for LinguaLink.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// LinguaLink CLI.
#[derive(Parser)]
#[command(name = "lingualink")]
#[command(about = "Live meeting caption capture and translation streaming")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.lingualink/config.toml, optional)
    #[arg(short, long, global = true, env = "LINGUALINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Attach to the meeting tab and stream captions (default)
    Run(RunArgs),

    /// Load and validate the configuration, then exit
    CheckConfig,
}

#[derive(clap::Args, Default)]
pub(crate) struct RunArgs {
    /// Browser remote debugging endpoint
    #[arg(long, env = "LINGUALINK_CDP_ENDPOINT")]
    pub cdp_endpoint: Option<String>,

    /// Substring of the meeting tab URL
    #[arg(long)]
    pub page: Option<String>,

    /// Translation backend WebSocket endpoint, in failover order
    #[arg(long = "backend")]
    pub backends: Vec<String>,

    /// Start with captions hidden
    #[arg(long)]
    pub hide_captions: bool,

    /// Target keys to disable at startup
    #[arg(long = "disable")]
    pub disabled_targets: Vec<String>,
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "ssai-replay",
    version,
    about = "Replay scripted server-side ad insertion sessions"
)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, env = "SSAI_REPLAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a session script and report what the ad manager did
    Replay {
        /// Session script (TOML)
        script: PathBuf,

        /// Output format, overrides the configured default
        #[arg(short, long, value_enum)]
        output: Option<OutputFormat>,

        /// Disable snapback regardless of configuration
        #[arg(long)]
        no_snapback: bool,
    },

    /// Show the effective configuration
    Config {
        #[arg(long)]
        show: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human readable timeline
    #[default]
    Pretty,
    /// Pretty-printed JSON report
    Json,
    /// Single-line JSON report
    JsonCompact,
}

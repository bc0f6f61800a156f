// crates/labeler/src/cli.rs
//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentiment_pulse_core::paths::default_config_path;

/// Reddit sentiment labeling with hosted LLMs
#[derive(Debug, Parser)]
#[command(name = "sentiment-pulse")]
#[command(about = "Ingest Reddit posts and label their sentiment with hosted LLMs")]
#[command(version)]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true, default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Enable debug logging for sentiment-pulse crates
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run ingestion and labeling on their schedules until Ctrl-C (default)
    Run,

    /// Run one labeling cycle now
    Label,

    /// Run one ingestion pass now
    Ingest {
        /// Only this subreddit instead of the configured list
        #[arg(short, long)]
        subreddit: Option<String>,
    },

    /// Print the sentiment distribution
    Stats {
        /// Only this subreddit
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Print recent labeling runs
    Runs {
        /// Number of runs to show
        #[arg(short, long, default_value = "10")]
        limit: i64,
    },
}

impl Cli {
    /// The requested command, `run` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}

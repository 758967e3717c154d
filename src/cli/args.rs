//! CLI argument definitions using clap
//!
//! Commands:
//! - sharebroker start --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sharebroker - a service broker for NFS volume shares
#[derive(Parser, Debug)]
#[command(name = "sharebroker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the broker and serve the lifecycle API
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./sharebroker.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

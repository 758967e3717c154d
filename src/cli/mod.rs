//! CLI module for the share broker
//!
//! One command: `start`, which boots the broker and serves the HTTP
//! API until the process is stopped.

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::start;
pub use errors::{CliError, CliResult};

/// Parse arguments and dispatch to the requested command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Start { config } => commands::start(&config),
    }
}

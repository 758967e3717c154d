//! CLI error types
//!
//! Every CLI error is fatal: the process prints it and exits non-zero.

use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("failed to open state store: {0}")]
    Store(#[from] StoreError),

    #[error("boot failed: {0}")]
    Boot(String),
}

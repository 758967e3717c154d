//! Mount client error types

use thiserror::Error;

/// Result type for mount operations
pub type MountResult<T> = Result<T, MountError>;

/// Mount client errors
#[derive(Debug, Clone, Error)]
pub enum MountError {
    #[error("failed to create directory '{path}': {reason}")]
    CreateDirFailed { path: String, reason: String },

    #[error("mount of '{remote}' on '{local}' failed: {reason}")]
    MountFailed {
        remote: String,
        local: String,
        reason: String,
    },

    #[error("failed to create share '{path}': {reason}")]
    ShareCreateFailed { path: String, reason: String },

    #[error("failed to delete share '{path}': {reason}")]
    ShareDeleteFailed { path: String, reason: String },

    #[error("share '{0}' not found")]
    ShareNotFound(String),

    #[error("remote filesystem configuration is unset")]
    ConfigUnset,

    #[error("failed to invoke '{executable}': {reason}")]
    InvokeFailed { executable: String, reason: String },
}

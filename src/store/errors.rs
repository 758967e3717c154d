//! State store error types

use thiserror::Error;

use super::StateCategory;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// State store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("failed to serialize {category} state: {reason}")]
    Serialize {
        category: StateCategory,
        reason: String,
    },

    #[error("failed to write {category} state to '{path}': {reason}")]
    Write {
        category: StateCategory,
        path: String,
        reason: String,
    },

    #[error("failed to create state directory '{path}': {reason}")]
    CreateDir { path: String, reason: String },
}

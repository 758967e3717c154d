//! Lifecycle controller error types

use thiserror::Error;

use crate::mounter::MountError;
use crate::store::StoreError;

/// Result type for lifecycle operations
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Lifecycle controller errors
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    #[error("service instance '{0}' does not exist")]
    InstanceNotFound(String),

    #[error("service binding '{0}' does not exist")]
    BindingNotFound(String),

    #[error("service instance '{0}' already exists with different attributes")]
    InstanceConflict(String),

    #[error("service binding '{0}' already exists with different attributes")]
    BindingConflict(String),

    #[error("invalid request parameters: {0}")]
    InvalidParameters(String),

    #[error("service instance '{0}' still has bindings")]
    OutstandingBindings(String),

    #[error("operation '{0}' is not implemented")]
    NotImplemented(&'static str),

    #[error(transparent)]
    Mount(#[from] MountError),

    #[error("state persistence failed: {0}")]
    Persistence(#[from] StoreError),
}

impl BrokerError {
    /// Short machine-readable error tag for wire responses.
    pub fn kind(&self) -> &'static str {
        match self {
            BrokerError::InstanceNotFound(_) => "InstanceNotFound",
            BrokerError::BindingNotFound(_) => "BindingNotFound",
            BrokerError::InstanceConflict(_) => "InstanceConflict",
            BrokerError::BindingConflict(_) => "BindingConflict",
            BrokerError::InvalidParameters(_) => "InvalidParameters",
            BrokerError::OutstandingBindings(_) => "OutstandingBindings",
            BrokerError::NotImplemented(_) => "NotImplemented",
            BrokerError::Mount(_) => "MountFailure",
            BrokerError::Persistence(_) => "PersistenceFailure",
        }
    }

    /// HTTP status for this error.
    ///
    /// Deprovision and unbind report missing resources as 410 Gone at
    /// the transport layer; everywhere else the mapping below applies.
    pub fn status_code(&self) -> u16 {
        match self {
            BrokerError::InstanceNotFound(_) => 404,
            BrokerError::BindingNotFound(_) => 404,
            BrokerError::InstanceConflict(_) => 409,
            BrokerError::BindingConflict(_) => 409,
            BrokerError::InvalidParameters(_) => 400,
            BrokerError::OutstandingBindings(_) => 409,
            BrokerError::NotImplemented(_) => 501,
            BrokerError::Mount(_) => 500,
            BrokerError::Persistence(_) => 500,
        }
    }
}

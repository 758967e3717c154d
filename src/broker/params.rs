//! Typed validation of recognized request parameters
//!
//! Requests carry an opaque key→value map. Three keys are recognized
//! and validated here; everything else passes through untouched for
//! forward compatibility.

use serde_json::Value;

use crate::model::{AccessMode, Parameters};

use super::errors::{BrokerError, BrokerResult};

pub const PARAM_READONLY: &str = "readonly";
pub const PARAM_CONTAINER_PATH: &str = "container_path";
pub const PARAM_PATH: &str = "path";

/// Default base directory for container mounts when no override is given.
pub const DEFAULT_CONTAINER_DIR: &str = "/var/vcap/data";

/// Maps `readonly` to an access mode.
///
/// Absent → read-write. A present value must be a JSON boolean; any
/// other type is a validation failure, not a coercion.
pub fn evaluate_mode(parameters: &Parameters) -> BrokerResult<AccessMode> {
    match parameters.get(PARAM_READONLY) {
        None => Ok(AccessMode::ReadWrite),
        Some(Value::Bool(true)) => Ok(AccessMode::ReadOnly),
        Some(Value::Bool(false)) => Ok(AccessMode::ReadWrite),
        Some(other) => Err(BrokerError::InvalidParameters(format!(
            "'{}' must be a boolean, got {}",
            PARAM_READONLY, other
        ))),
    }
}

/// Resolves the container directory for a binding.
///
/// `container_path` wins over `path`; an empty string counts as unset.
/// Without an override the directory defaults to
/// `{DEFAULT_CONTAINER_DIR}/{instance_id}`.
pub fn evaluate_container_dir(parameters: &Parameters, instance_id: &str) -> BrokerResult<String> {
    for key in [PARAM_CONTAINER_PATH, PARAM_PATH] {
        match parameters.get(key) {
            None => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(Value::String(s)) => return Ok(s.clone()),
            Some(other) => {
                return Err(BrokerError::InvalidParameters(format!(
                    "'{}' must be a string, got {}",
                    key, other
                )))
            }
        }
    }
    Ok(format!("{}/{}", DEFAULT_CONTAINER_DIR, instance_id))
}

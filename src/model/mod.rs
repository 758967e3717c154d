//! Wire and persisted record types for the share broker
//!
//! Everything here is plain data: requests and responses exchanged with
//! the orchestrator, the two persisted record types, and the derived
//! volume-mount descriptor chain. No behavior beyond construction and
//! (de)serialization.

mod binding;
mod catalog;
mod instance;
mod volume;

pub use binding::{BindRequest, BindResponse, Credentials, ServiceBinding};
pub use catalog::{Catalog, Service, ServicePlan};
pub use instance::{LastOperation, ProvisionRequest, ProvisionResponse, ServiceInstance};
pub use volume::{AccessMode, MountConfig, SharedDevice, VolumeMount};

use std::collections::BTreeMap;

/// Opaque request parameters: a key to JSON value mapping.
///
/// Recognized keys get typed validation in the broker; unknown keys pass
/// through untouched. A `BTreeMap` keeps persisted files deterministic.
pub type Parameters = BTreeMap<String, serde_json::Value>;

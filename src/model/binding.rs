//! Service binding records and bind request/response types

use serde::{Deserialize, Serialize};

use super::{Parameters, VolumeMount};

/// Bind request body as sent by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindRequest {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub app_guid: String,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Credentials block of a bind response.
///
/// Filesystem access is granted through the volume mount descriptor, so
/// this serializes as an empty object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {}

/// Bind response: empty credentials plus one volume-mount descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindResponse {
    pub credentials: Credentials,
    pub volume_mounts: Vec<VolumeMount>,
}

/// A recorded binding of an instance to a consumer.
///
/// Binding ids are global keys across the whole store, not scoped to an
/// instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub id: String,
    pub service_instance_id: String,
    pub service_id: String,
    pub service_plan_id: String,
    pub app_guid: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl ServiceBinding {
    /// Builds the record created by a successful bind.
    pub fn from_request(id: &str, instance_id: &str, req: &BindRequest) -> Self {
        Self {
            id: id.to_string(),
            service_instance_id: instance_id.to_string(),
            service_id: req.service_id.clone(),
            service_plan_id: req.plan_id.clone(),
            app_guid: req.app_guid.clone(),
            parameters: req.parameters.clone(),
        }
    }
}

//! Service instance records and provision request/response types

use serde::{Deserialize, Serialize};

use super::Parameters;

/// Poll interval handed to the orchestrator while an instance is being set up.
pub const DEFAULT_POLL_INTERVAL_SECONDS: u32 = 10;

/// Progress marker for an asynchronous lifecycle operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastOperation {
    pub state: String,
    pub description: String,
    pub async_poll_interval_seconds: u32,
}

impl LastOperation {
    /// The operation state recorded right after a share is created.
    pub fn provisioning() -> Self {
        Self {
            state: "in progress".to_string(),
            description: "creating nfs service instance".to_string(),
            async_poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
        }
    }
}

/// Provision request body as sent by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub plan_id: String,
    #[serde(default)]
    pub organization_guid: String,
    #[serde(default)]
    pub space_guid: String,
    #[serde(default)]
    pub parameters: Parameters,
}

/// Provision response: dashboard location plus operation progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub dashboard_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<LastOperation>,
}

/// A provisioned service instance.
///
/// At most one record exists per instance id. The record is immutable
/// after creation except for `last_operation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub id: String,
    pub service_id: String,
    pub plan_id: String,
    pub organization_guid: String,
    pub space_guid: String,
    #[serde(default)]
    pub parameters: Parameters,
    pub dashboard_url: String,
    pub last_operation: Option<LastOperation>,
}

impl ServiceInstance {
    /// Builds the record created by a successful provision.
    pub fn from_request(id: &str, req: &ProvisionRequest, dashboard_url: &str) -> Self {
        Self {
            id: id.to_string(),
            service_id: req.service_id.clone(),
            plan_id: req.plan_id.clone(),
            organization_guid: req.organization_guid.clone(),
            space_guid: req.space_guid.clone(),
            parameters: req.parameters.clone(),
            dashboard_url: dashboard_url.to_string(),
            last_operation: Some(LastOperation::provisioning()),
        }
    }

    /// The response the orchestrator saw when this record was created.
    pub fn provision_response(&self) -> ProvisionResponse {
        ProvisionResponse {
            dashboard_url: self.dashboard_url.clone(),
            last_operation: self.last_operation.clone(),
        }
    }
}

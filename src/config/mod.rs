//! Broker configuration
//!
//! One JSON file holds everything the process needs: the remote
//! filesystem endpoint, the local mount root, the state directory, the
//! listen address, and the advertised service identity. Optional fields
//! default to the values below; required fields are validated on load.

mod errors;

pub use errors::{ConfigError, ConfigResult};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::broker::{DeprovisionPolicy, ServiceIdentity};
use crate::http_server::HttpServerConfig;

/// Broker process configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// Remote filesystem host, optionally `host:port` (required)
    pub remote_host: String,

    /// Path exported by the remote host (default: "/")
    #[serde(default = "default_remote_root")]
    pub remote_root: String,

    /// NFS protocol version (default: 4; 3 selects legacy options)
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u32,

    /// Local directory the remote root is mounted on (required)
    pub mount_root: String,

    /// Directory holding the persisted state files (required)
    pub state_dir: String,

    /// HTTP listen address
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Whether deprovision refuses instances with bindings
    #[serde(default)]
    pub deprovision_policy: DeprovisionPolicy,

    /// Advertised service name (default: "nfs")
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Advertised service id (default: "nfs-service-guid")
    #[serde(default = "default_service_id")]
    pub service_id: String,

    #[serde(default = "default_service_description")]
    pub service_description: String,

    /// Advertised plan name (default: "free")
    #[serde(default = "default_plan_name")]
    pub plan_name: String,

    /// Advertised plan id (default: "free-plan-guid")
    #[serde(default = "default_plan_id")]
    pub plan_id: String,

    #[serde(default = "default_plan_description")]
    pub plan_description: String,
}

fn default_remote_root() -> String {
    "/".to_string()
}

fn default_protocol_version() -> u32 {
    4
}

fn default_service_name() -> String {
    "nfs".to_string()
}

fn default_service_id() -> String {
    "nfs-service-guid".to_string()
}

fn default_service_description() -> String {
    "NFS filesystem volume service, including share creation and volume mounts".to_string()
}

fn default_plan_name() -> String {
    "free".to_string()
}

fn default_plan_id() -> String {
    "free-plan-guid".to_string()
}

fn default_plan_description() -> String {
    "free nfs filesystem".to_string()
}

impl BrokerConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: BrokerConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.remote_host.is_empty() {
            return Err(ConfigError::Invalid("remote_host must not be empty".into()));
        }
        if self.protocol_version == 0 {
            return Err(ConfigError::Invalid("protocol_version must be > 0".into()));
        }
        if self.mount_root.is_empty() {
            return Err(ConfigError::Invalid("mount_root must not be empty".into()));
        }
        if self.state_dir.is_empty() {
            return Err(ConfigError::Invalid("state_dir must not be empty".into()));
        }
        Ok(())
    }

    /// The service identity advertised in the catalog.
    pub fn service_identity(&self) -> ServiceIdentity {
        ServiceIdentity {
            service_name: self.service_name.clone(),
            service_id: self.service_id.clone(),
            service_description: self.service_description.clone(),
            plan_name: self.plan_name.clone(),
            plan_id: self.plan_id.clone(),
            plan_description: self.plan_description.clone(),
        }
    }
}

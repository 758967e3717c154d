//! Volume-mount descriptor chain
//!
//! These types are derived on every bind from current mounter state plus
//! the binding's parameters. They are never persisted.

use serde::{Deserialize, Serialize};

/// Access mode requested for a mounted share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    #[serde(rename = "r")]
    ReadOnly,
    #[serde(rename = "rw")]
    ReadWrite,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::ReadOnly => "r",
            AccessMode::ReadWrite => "rw",
        }
    }
}

/// Parameters the volume driver needs to reach the remote share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountConfig {
    pub remote_info: String,
    pub version: u32,
    pub remote_mountpoint: String,
    pub local_mountpoint: String,
}

/// Device block of a volume mount descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedDevice {
    pub volume_id: String,
    pub mount_config: MountConfig,
}

/// One volume mount handed to the consumer's container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMount {
    pub container_dir: String,
    pub mode: AccessMode,
    pub driver: String,
    pub device_type: String,
    pub device: SharedDevice,
}

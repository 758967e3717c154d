//! CLI command implementations
//!
//! Boot sequence: load and validate configuration, open the state
//! store, construct the mount client and broker, then hand the router
//! to a tokio runtime. The remote root is NOT mounted at boot; the
//! first provision mounts it lazily.

use std::path::Path;
use std::sync::Arc;

use crate::broker::Broker;
use crate::config::BrokerConfig;
use crate::http_server::HttpServer;
use crate::mounter::{CommandInvoker, NfsMounter};
use crate::observability::Logger;
use crate::store::StateStore;

use super::errors::{CliError, CliResult};

/// Start the broker and serve until the process is stopped.
pub fn start(config_path: &Path) -> CliResult<()> {
    let config = BrokerConfig::load(config_path)?;

    Logger::info(
        "BROKER_START",
        &[
            ("remote_host", &config.remote_host),
            ("remote_root", &config.remote_root),
            ("protocol_version", &config.protocol_version.to_string()),
            ("mount_root", &config.mount_root),
            ("state_dir", &config.state_dir),
        ],
    );

    let store = StateStore::open(Path::new(&config.state_dir))?;

    let mounter = NfsMounter::new(
        config.remote_host.clone(),
        config.remote_root.clone(),
        config.protocol_version,
        config.mount_root.clone(),
        CommandInvoker,
    );

    let broker = Arc::new(Broker::new(
        config.service_identity(),
        config.remote_root.clone(),
        config.deprovision_policy,
        mounter,
        store,
    ));

    let server = HttpServer::new(config.http.clone(), broker);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Boot(format!("failed to create tokio runtime: {}", e)))?;

    rt.block_on(server.start())
        .map_err(|e| CliError::Boot(format!("http server failed: {}", e)))
}

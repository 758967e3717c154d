//! Mount client for the shared remote filesystem
//!
//! Wraps the external mount facility behind the [`Invoker`] trait and
//! exposes the [`MountClient`] trait to the lifecycle controller: mount
//! the remote root once, then create and remove per-tenant share
//! directories underneath it.

mod errors;
mod invoker;
mod nfs;

pub use errors::{MountError, MountResult};
pub use invoker::{CommandInvoker, Invoker};
pub use nfs::{NfsMounter, RemoteConfig, SharePaths, CELL_BASE_PATH, NFS_V3_OPTIONS};

use std::path::PathBuf;

/// Capability seam between the lifecycle controller and the OS.
///
/// `mount_root` is one atomic step of this contract even though the
/// implementation probes and then mounts via two system calls: callers
/// must hold their own mutual exclusion (the controller's single
/// operation lock does), because a standalone client used concurrently
/// would race between probe and mount.
pub trait MountClient {
    /// Cached mount state; never re-probes the OS.
    fn root_mounted(&self) -> bool;

    /// Ensures the local root exists and the remote path is mounted on
    /// it, mounting at most once per process lifetime.
    fn mount_root(&mut self, remote_path: &str) -> MountResult<PathBuf>;

    /// Creates the share directory for `name` (idempotent).
    fn create_share(&self, name: &str) -> MountResult<PathBuf>;

    /// Recursively removes the share directory for `name`.
    fn delete_share(&self, name: &str) -> MountResult<()>;

    /// Resolves the remote-side and container-cell paths for an
    /// existing share; fails if the share directory does not exist.
    fn share_paths(&self, name: &str) -> MountResult<SharePaths>;

    /// Remote host and protocol version; fails if either is unset.
    fn remote_config(&self) -> MountResult<RemoteConfig>;
}

//! NFS-backed mount client

use std::fs;
use std::path::PathBuf;

use crate::observability::Logger;

use super::errors::{MountError, MountResult};
use super::invoker::Invoker;
use super::MountClient;

/// Mount options used for protocol version 3.
pub const NFS_V3_OPTIONS: &str = "port=2049,nolock,proto=tcp";

/// Base path of container cells on the host running the consumers.
pub const CELL_BASE_PATH: &str = "/var/vcap/data/volumes";

/// Remote endpoint details a bind response advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub remote_host: String,
    pub version: u32,
}

/// Resolved locations of one share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePaths {
    /// Path of the share under the remote mount root.
    pub remote: String,
    /// Path the consumer's cell will mount the share at.
    pub cell: String,
}

/// Mount client backed by the external `mount`/`mountpoint` tools.
///
/// Tracks the mounted flag itself; the remote root is mounted at most
/// once per process lifetime.
pub struct NfsMounter<I: Invoker> {
    remote_host: String,
    remote_root: String,
    version: u32,
    local_root: PathBuf,
    mounted: bool,
    invoker: I,
}

impl<I: Invoker> NfsMounter<I> {
    pub fn new(
        remote_host: impl Into<String>,
        remote_root: impl Into<String>,
        version: u32,
        local_root: impl Into<PathBuf>,
        invoker: I,
    ) -> Self {
        Self {
            remote_host: remote_host.into(),
            remote_root: remote_root.into(),
            version,
            local_root: local_root.into(),
            mounted: false,
            invoker,
        }
    }

    fn share_dir(&self, name: &str) -> PathBuf {
        self.local_root.join(name)
    }

    /// Best-effort probe of whether the local root is already a mount
    /// point. The external tool's human-readable output is compared
    /// textually, which is brittle across OS and tool versions; a probe
    /// failure is therefore reported as `None`, never as an error.
    fn probe_mountpoint(&self) -> Option<bool> {
        let root = self.local_root.display().to_string();
        match self.invoker.invoke("mountpoint", &[root.clone()]) {
            Ok(out) => {
                let normalized = out.replace('\n', "");
                Some(normalized.eq_ignore_ascii_case(&format!("{} is a mountpoint", root)))
            }
            Err(e) => {
                Logger::warn(
                    "MOUNTPOINT_PROBE_FAILED",
                    &[("path", &root), ("reason", &e.to_string())],
                );
                None
            }
        }
    }
}

impl<I: Invoker> MountClient for NfsMounter<I> {
    fn root_mounted(&self) -> bool {
        self.mounted
    }

    fn mount_root(&mut self, remote_path: &str) -> MountResult<PathBuf> {
        fs::create_dir_all(&self.local_root).map_err(|e| MountError::CreateDirFailed {
            path: self.local_root.display().to_string(),
            reason: e.to_string(),
        })?;

        if self.probe_mountpoint() == Some(true) {
            self.mounted = true;
            return Ok(self.local_root.clone());
        }

        let remote = format!("{}:{}", self.remote_host, remote_path);
        let local = self.local_root.display().to_string();
        let args = match self.version {
            3 => vec![
                "-o".to_string(),
                NFS_V3_OPTIONS.to_string(),
                remote.clone(),
                local.clone(),
            ],
            _ => vec![
                "-t".to_string(),
                "nfs4".to_string(),
                remote.clone(),
                local.clone(),
            ],
        };

        self.invoker
            .invoke("mount", &args)
            .map_err(|e| MountError::MountFailed {
                remote,
                local,
                reason: e.to_string(),
            })?;

        self.mounted = true;
        Logger::info(
            "ROOT_MOUNTED",
            &[("local_root", &self.local_root.display().to_string())],
        );
        Ok(self.local_root.clone())
    }

    fn create_share(&self, name: &str) -> MountResult<PathBuf> {
        let share_path = self.share_dir(name);
        fs::create_dir_all(&share_path).map_err(|e| MountError::ShareCreateFailed {
            path: share_path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(share_path)
    }

    fn delete_share(&self, name: &str) -> MountResult<()> {
        let share_path = self.share_dir(name);
        fs::remove_dir_all(&share_path).map_err(|e| MountError::ShareDeleteFailed {
            path: share_path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn share_paths(&self, name: &str) -> MountResult<SharePaths> {
        if !self.share_dir(name).exists() {
            return Err(MountError::ShareNotFound(name.to_string()));
        }

        Ok(SharePaths {
            remote: join_slash(&self.remote_root, name),
            cell: join_slash(CELL_BASE_PATH, name),
        })
    }

    fn remote_config(&self) -> MountResult<RemoteConfig> {
        if self.remote_host.is_empty() || self.version == 0 {
            return Err(MountError::ConfigUnset);
        }
        Ok(RemoteConfig {
            remote_host: self.remote_host.clone(),
            version: self.version,
        })
    }
}

/// Joins with a single `/`; remote and cell paths are wire strings, not
/// host `Path`s.
fn join_slash(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Scripted invoker: canned mountpoint reply, records every call.
    struct ScriptedInvoker {
        calls: Mutex<Vec<(String, Vec<String>)>>,
        mountpoint_reply: MountResult<String>,
    }

    impl ScriptedInvoker {
        fn new(mountpoint_reply: MountResult<String>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                mountpoint_reply,
            }
        }
    }

    impl Invoker for ScriptedInvoker {
        fn invoke(&self, executable: &str, args: &[String]) -> MountResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((executable.to_string(), args.to_vec()));
            match executable {
                "mountpoint" => self.mountpoint_reply.clone(),
                _ => Ok(String::new()),
            }
        }
    }

    fn mounter_in(dir: &TempDir, version: u32, reply: MountResult<String>) -> NfsMounter<ScriptedInvoker> {
        NfsMounter::new(
            "nfs.example.com",
            "/export",
            version,
            dir.path().join("mnt"),
            ScriptedInvoker::new(reply),
        )
    }

    #[test]
    fn test_version_3_selects_fixed_option_string() {
        let dir = TempDir::new().unwrap();
        let mut mounter = mounter_in(&dir, 3, Ok(String::new()));

        mounter.mount_root("/export").unwrap();

        let calls = mounter.invoker.calls.lock().unwrap();
        let mount_call = calls.iter().find(|(exe, _)| exe == "mount").unwrap();
        assert_eq!(mount_call.1[0], "-o");
        assert_eq!(mount_call.1[1], NFS_V3_OPTIONS);
        assert_eq!(mount_call.1[2], "nfs.example.com:/export");
    }

    #[test]
    fn test_other_versions_default_to_nfs4() {
        let dir = TempDir::new().unwrap();
        let mut mounter = mounter_in(&dir, 4, Ok(String::new()));

        mounter.mount_root("/export").unwrap();

        let calls = mounter.invoker.calls.lock().unwrap();
        let mount_call = calls.iter().find(|(exe, _)| exe == "mount").unwrap();
        assert_eq!(&mount_call.1[..2], ["-t", "nfs4"]);
    }

    #[test]
    fn test_probe_match_short_circuits_mount() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("mnt");
        let reply = Ok(format!("{} is a mountpoint\n", root.display()));
        let mut mounter = NfsMounter::new(
            "nfs.example.com",
            "/export",
            4,
            root,
            ScriptedInvoker::new(reply),
        );

        mounter.mount_root("/export").unwrap();

        assert!(mounter.root_mounted());
        let calls = mounter.invoker.calls.lock().unwrap();
        assert!(calls.iter().all(|(exe, _)| exe != "mount"));
    }

    #[test]
    fn test_probe_failure_falls_through_to_mount() {
        let dir = TempDir::new().unwrap();
        let probe_err = Err(MountError::InvokeFailed {
            executable: "mountpoint".to_string(),
            reason: "not installed".to_string(),
        });
        let mut mounter = mounter_in(&dir, 4, probe_err);

        mounter.mount_root("/export").unwrap();

        assert!(mounter.root_mounted());
        let calls = mounter.invoker.calls.lock().unwrap();
        assert!(calls.iter().any(|(exe, _)| exe == "mount"));
    }

    #[test]
    fn test_share_paths_for_missing_share() {
        let dir = TempDir::new().unwrap();
        let mounter = mounter_in(&dir, 4, Ok(String::new()));

        let err = mounter.share_paths("ghost").unwrap_err();
        assert!(matches!(err, MountError::ShareNotFound(_)));
    }

    #[test]
    fn test_share_paths_join_remote_root_and_cell_base() {
        let dir = TempDir::new().unwrap();
        let mounter = mounter_in(&dir, 4, Ok(String::new()));
        mounter.create_share("i1").unwrap();

        let paths = mounter.share_paths("i1").unwrap();
        assert_eq!(paths.remote, "/export/i1");
        assert_eq!(paths.cell, format!("{}/i1", CELL_BASE_PATH));
    }

    #[test]
    fn test_remote_config_requires_host_and_version() {
        let dir = TempDir::new().unwrap();
        let unset = NfsMounter::new(
            "",
            "/export",
            4,
            dir.path().join("mnt"),
            ScriptedInvoker::new(Ok(String::new())),
        );
        assert!(matches!(
            unset.remote_config().unwrap_err(),
            MountError::ConfigUnset
        ));

        let set = mounter_in(&dir, 4, Ok(String::new()));
        let config = set.remote_config().unwrap();
        assert_eq!(config.remote_host, "nfs.example.com");
        assert_eq!(config.version, 4);
    }
}

//! Lifecycle invariant tests
//!
//! End-to-end coverage of the controller contract:
//! - Idempotent replay returns the original response with no new side effects
//! - Any field-level mismatch on a repeated request is a conflict
//! - Operations on absent instances/bindings fail with typed errors
//! - Parameter validation (readonly, container path overrides)
//! - Deprovision policy handling of outstanding bindings

use std::sync::{Arc, Mutex};

use sharebroker::broker::{Broker, BrokerError, DeprovisionPolicy, Outcome, ServiceIdentity};
use sharebroker::model::{AccessMode, BindRequest, Parameters, ProvisionRequest};
use sharebroker::mounter::{Invoker, MountError, MountResult, NfsMounter};
use sharebroker::store::StateStore;
use serde_json::json;
use tempfile::TempDir;
use uuid::Uuid;

// =============================================================================
// Test Utilities
// =============================================================================

type CallLog = Arc<Mutex<Vec<(String, Vec<String>)>>>;

/// Invoker whose call log outlives the broker that owns it.
///
/// The mountpoint probe always fails (as on a host without the tool),
/// so mounting falls through to the `mount` invocation.
#[derive(Clone)]
struct SharedInvoker {
    calls: CallLog,
}

impl Invoker for SharedInvoker {
    fn invoke(&self, executable: &str, args: &[String]) -> MountResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((executable.to_string(), args.to_vec()));
        match executable {
            "mountpoint" => Err(MountError::InvokeFailed {
                executable: executable.to_string(),
                reason: "mountpoint: command not found".to_string(),
            }),
            _ => Ok(String::new()),
        }
    }
}

struct Harness {
    broker: Broker<NfsMounter<SharedInvoker>>,
    calls: CallLog,
    mount_root: std::path::PathBuf,
    _mount_dir: TempDir,
    _state_dir: TempDir,
}

fn harness(policy: DeprovisionPolicy) -> Harness {
    let mount_dir = TempDir::new().expect("Failed to create temp dir");
    let state_dir = TempDir::new().expect("Failed to create temp dir");
    let mount_root = mount_dir.path().join("mnt");

    let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
    let mounter = NfsMounter::new(
        "nfs.example.com",
        "/export",
        4,
        mount_root.clone(),
        SharedInvoker {
            calls: calls.clone(),
        },
    );
    let store = StateStore::open(state_dir.path()).unwrap();
    let broker = Broker::new(ServiceIdentity::default(), "/export", policy, mounter, store);

    Harness {
        broker,
        calls,
        mount_root,
        _mount_dir: mount_dir,
        _state_dir: state_dir,
    }
}

fn provision_request() -> ProvisionRequest {
    ProvisionRequest {
        service_id: "nfs-service-guid".to_string(),
        plan_id: "free-plan-guid".to_string(),
        organization_guid: "org-guid".to_string(),
        space_guid: "space-guid".to_string(),
        parameters: Parameters::new(),
    }
}

fn bind_request() -> BindRequest {
    BindRequest {
        service_id: "nfs-service-guid".to_string(),
        plan_id: "free-plan-guid".to_string(),
        app_guid: "app-guid".to_string(),
        parameters: Parameters::new(),
    }
}

fn mount_invocations(calls: &CallLog) -> usize {
    calls
        .lock()
        .unwrap()
        .iter()
        .filter(|(exe, _)| exe == "mount")
        .count()
}

// =============================================================================
// Idempotence
// =============================================================================

/// Provisioning the same id twice with an identical request returns the
/// same response both times and mounts/creates exactly once.
#[test]
fn test_provision_is_idempotent() {
    let h = harness(DeprovisionPolicy::Permissive);
    let id = Uuid::new_v4().to_string();
    let req = provision_request();

    let first = h.broker.provision(&id, &req).unwrap();
    let second = h.broker.provision(&id, &req).unwrap();

    let first = match first {
        Outcome::Created(r) => r,
        Outcome::Replayed(_) => panic!("first provision must create"),
    };
    let second = match second {
        Outcome::Replayed(r) => r,
        Outcome::Created(_) => panic!("second provision must replay"),
    };
    assert_eq!(first, second);
    assert_eq!(mount_invocations(&h.calls), 1);
    assert!(h.mount_root.join(&id).is_dir());
}

/// The root is mounted once per process, not once per instance.
#[test]
fn test_root_mounts_once_across_instances() {
    let h = harness(DeprovisionPolicy::Permissive);

    h.broker.provision("i1", &provision_request()).unwrap();
    h.broker.provision("i2", &provision_request()).unwrap();

    assert_eq!(mount_invocations(&h.calls), 1);
    assert!(h.mount_root.join("i1").is_dir());
    assert!(h.mount_root.join("i2").is_dir());
}

// =============================================================================
// Conflict detection
// =============================================================================

/// A repeated provision with any differing field conflicts and leaves
/// the original record untouched.
#[test]
fn test_provision_conflict_on_differing_organization() {
    let h = harness(DeprovisionPolicy::Permissive);
    let req = provision_request();
    h.broker.provision("i1", &req).unwrap();

    let mut differing = provision_request();
    differing.organization_guid = "other-org".to_string();
    let err = h.broker.provision("i1", &differing).unwrap_err();
    assert!(matches!(err, BrokerError::InstanceConflict(_)));

    // the original record still replays
    let replay = h.broker.provision("i1", &req).unwrap();
    assert!(matches!(replay, Outcome::Replayed(_)));
}

#[test]
fn test_bind_conflict_on_differing_app() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();
    h.broker.bind("i1", "b1", &bind_request()).unwrap();

    let mut differing = bind_request();
    differing.app_guid = "other-app".to_string();
    let err = h.broker.bind("i1", "b1", &differing).unwrap_err();
    assert!(matches!(err, BrokerError::BindingConflict(_)));
}

/// Binding ids are global keys: reusing one against another instance is
/// a conflict, not a second binding.
#[test]
fn test_binding_ids_are_global_keys() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();
    h.broker.provision("i2", &provision_request()).unwrap();
    h.broker.bind("i1", "b1", &bind_request()).unwrap();

    let err = h.broker.bind("i2", "b1", &bind_request()).unwrap_err();
    assert!(matches!(err, BrokerError::BindingConflict(_)));
}

#[test]
fn test_bind_replay_returns_equal_response() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();

    let first = h.broker.bind("i1", "b1", &bind_request()).unwrap();
    let second = h.broker.bind("i1", "b1", &bind_request()).unwrap();

    let first = match first {
        Outcome::Created(r) => r,
        Outcome::Replayed(_) => panic!("first bind must create"),
    };
    let second = match second {
        Outcome::Replayed(r) => r,
        Outcome::Created(_) => panic!("second bind must replay"),
    };
    assert_eq!(first, second);
}

// =============================================================================
// Lifecycle ordering
// =============================================================================

#[test]
fn test_bind_before_provision_fails() {
    let h = harness(DeprovisionPolicy::Permissive);
    let err = h.broker.bind("ghost", "b1", &bind_request()).unwrap_err();
    assert!(matches!(err, BrokerError::InstanceNotFound(_)));
}

#[test]
fn test_unbind_before_provision_fails() {
    let h = harness(DeprovisionPolicy::Permissive);
    let err = h.broker.unbind("ghost", "b1").unwrap_err();
    assert!(matches!(err, BrokerError::InstanceNotFound(_)));
}

// =============================================================================
// Mode mapping and container path
// =============================================================================

#[test]
fn test_readonly_true_yields_r_mode() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();

    let mut req = bind_request();
    req.parameters.insert("readonly".to_string(), json!(true));
    let response = h.broker.bind("i1", "b1", &req).unwrap().into_inner();

    assert_eq!(response.volume_mounts[0].mode, AccessMode::ReadOnly);
}

#[test]
fn test_empty_parameters_yield_rw_mode() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();

    let response = h
        .broker
        .bind("i1", "b1", &bind_request())
        .unwrap()
        .into_inner();

    assert_eq!(response.volume_mounts[0].mode, AccessMode::ReadWrite);
}

#[test]
fn test_non_boolean_readonly_is_a_validation_failure() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();

    let mut req = bind_request();
    req.parameters.insert("readonly".to_string(), json!("yes"));
    let err = h.broker.bind("i1", "b1", &req).unwrap_err();

    assert!(matches!(err, BrokerError::InvalidParameters(_)));
    // the failed bind must not leave a record behind
    assert!(matches!(
        h.broker.binding("b1").unwrap_err(),
        BrokerError::BindingNotFound(_)
    ));
}

#[test]
fn test_container_path_override_and_default() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();

    let mut overridden = bind_request();
    overridden
        .parameters
        .insert("container_path".to_string(), json!("/custom/dir"));
    let response = h.broker.bind("i1", "b1", &overridden).unwrap().into_inner();
    assert_eq!(response.volume_mounts[0].container_dir, "/custom/dir");

    let response = h
        .broker
        .bind("i1", "b2", &bind_request())
        .unwrap()
        .into_inner();
    assert_eq!(
        response.volume_mounts[0].container_dir,
        "/var/vcap/data/i1"
    );
}

#[test]
fn test_bind_descriptor_points_at_the_share() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();

    let response = h
        .broker
        .bind("i1", "b1", &bind_request())
        .unwrap()
        .into_inner();

    let mount = &response.volume_mounts[0];
    assert_eq!(mount.driver, "nfsdriver");
    assert_eq!(mount.device_type, "shared");
    assert_eq!(mount.device.volume_id, "i1");
    assert_eq!(mount.device.mount_config.remote_info, "nfs.example.com");
    assert_eq!(mount.device.mount_config.version, 4);
    assert_eq!(mount.device.mount_config.remote_mountpoint, "/export/i1");
    assert_eq!(
        mount.device.mount_config.local_mountpoint,
        "/var/vcap/data/volumes/i1"
    );
}

// =============================================================================
// Deletion
// =============================================================================

#[test]
fn test_deprovision_removes_share_and_record() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();
    assert!(h.mount_root.join("i1").is_dir());

    h.broker.deprovision("i1").unwrap();
    assert!(!h.mount_root.join("i1").exists());

    let err = h.broker.deprovision("i1").unwrap_err();
    assert!(matches!(err, BrokerError::InstanceNotFound(_)));
}

// =============================================================================
// Unbind
// =============================================================================

#[test]
fn test_unbind_removes_binding_but_not_share() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();
    h.broker.bind("i1", "b1", &bind_request()).unwrap();

    h.broker.unbind("i1", "b1").unwrap();

    assert!(matches!(
        h.broker.binding("b1").unwrap_err(),
        BrokerError::BindingNotFound(_)
    ));
    assert!(h.mount_root.join("i1").is_dir());

    let err = h.broker.unbind("i1", "b1").unwrap_err();
    assert!(matches!(err, BrokerError::BindingNotFound(_)));
}

// =============================================================================
// Deprovision policy
// =============================================================================

#[test]
fn test_permissive_deprovision_orphans_bindings() {
    let h = harness(DeprovisionPolicy::Permissive);
    h.broker.provision("i1", &provision_request()).unwrap();
    h.broker.bind("i1", "b1", &bind_request()).unwrap();

    h.broker.deprovision("i1").unwrap();

    // observed legacy behavior: the binding record survives its instance
    assert!(h.broker.binding("b1").is_ok());
}

#[test]
fn test_strict_deprovision_refuses_outstanding_bindings() {
    let h = harness(DeprovisionPolicy::Strict);
    h.broker.provision("i1", &provision_request()).unwrap();
    h.broker.bind("i1", "b1", &bind_request()).unwrap();

    let err = h.broker.deprovision("i1").unwrap_err();
    assert!(matches!(err, BrokerError::OutstandingBindings(_)));

    h.broker.unbind("i1", "b1").unwrap();
    h.broker.deprovision("i1").unwrap();
}

// =============================================================================
// Unimplemented operations
// =============================================================================

#[test]
fn test_update_and_last_operation_are_typed_failures() {
    let h = harness(DeprovisionPolicy::Permissive);

    assert!(matches!(
        h.broker.update("i1").unwrap_err(),
        BrokerError::NotImplemented("update")
    ));
    assert!(matches!(
        h.broker.last_operation("i1").unwrap_err(),
        BrokerError::NotImplemented("last_operation")
    ));
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn test_catalog_advertises_one_bindable_service() {
    let h = harness(DeprovisionPolicy::Permissive);
    let catalog = h.broker.catalog();

    assert_eq!(catalog.services.len(), 1);
    let service = &catalog.services[0];
    assert!(service.bindable);
    assert_eq!(service.requires, vec!["volume_mount"]);
}

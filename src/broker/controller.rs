//! The lifecycle controller

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::{
    BindRequest, BindResponse, Catalog, Credentials, MountConfig, ProvisionRequest,
    ProvisionResponse, ServiceBinding, ServiceInstance, SharedDevice, VolumeMount,
};
use crate::mounter::MountClient;
use crate::observability::OpScope;
use crate::store::StateStore;

use super::catalog::{catalog_for, ServiceIdentity};
use super::conflict;
use super::errors::{BrokerError, BrokerResult};
use super::params;
use super::{DeprovisionPolicy, Outcome};

/// Dashboard location advertised for every instance.
pub const DASHBOARD_URL: &str = "http://dashboard_url";

/// The broker: serializes every lifecycle operation behind one lock
/// spanning validation, the mount side effect, and persistence.
///
/// A slow or hung external mount invocation therefore blocks all other
/// lifecycle operations for the duration of that call.
pub struct Broker<M: MountClient> {
    identity: ServiceIdentity,
    remote_root: String,
    policy: DeprovisionPolicy,
    inner: Mutex<BrokerInner<M>>,
}

struct BrokerInner<M> {
    mounter: M,
    store: StateStore,
}

impl<M: MountClient> Broker<M> {
    pub fn new(
        identity: ServiceIdentity,
        remote_root: impl Into<String>,
        policy: DeprovisionPolicy,
        mounter: M,
        store: StateStore,
    ) -> Self {
        Self {
            identity,
            remote_root: remote_root.into(),
            policy,
            inner: Mutex::new(BrokerInner { mounter, store }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, BrokerInner<M>> {
        // A poisoned lock only records that a prior operation panicked;
        // the guarded state remains the source of truth.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The static service catalog.
    pub fn catalog(&self) -> Catalog {
        catalog_for(&self.identity)
    }

    /// Provisions an instance: mounts the remote root on first use,
    /// creates the share directory, records and persists the instance.
    ///
    /// A repeated request with identical attributes replays the original
    /// response without new side effects; differing attributes conflict.
    pub fn provision(
        &self,
        instance_id: &str,
        req: &ProvisionRequest,
    ) -> BrokerResult<Outcome<ProvisionResponse>> {
        let scope = OpScope::new("PROVISION", &[("instance_id", instance_id)]);
        let result = self.provision_locked(instance_id, req);
        match &result {
            Ok(_) => scope.complete(),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    fn provision_locked(
        &self,
        instance_id: &str,
        req: &ProvisionRequest,
    ) -> BrokerResult<Outcome<ProvisionResponse>> {
        let mut inner = self.locked();

        if let Some(existing) = inner.store.instance(instance_id) {
            if conflict::instance_matches_request(existing, req) {
                return Ok(Outcome::Replayed(existing.provision_response()));
            }
            return Err(BrokerError::InstanceConflict(instance_id.to_string()));
        }

        if !inner.mounter.root_mounted() {
            inner.mounter.mount_root(&self.remote_root)?;
        }
        inner.mounter.create_share(instance_id)?;

        let instance = ServiceInstance::from_request(instance_id, req, DASHBOARD_URL);
        let response = instance.provision_response();
        inner.store.put_instance(instance)?;

        Ok(Outcome::Created(response))
    }

    /// Deprovisions an instance: deletes its share directory, removes
    /// and persists the record. Binding handling follows the configured
    /// deprovision policy.
    pub fn deprovision(&self, instance_id: &str) -> BrokerResult<()> {
        let scope = OpScope::new("DEPROVISION", &[("instance_id", instance_id)]);
        let result = self.deprovision_locked(instance_id);
        match &result {
            Ok(_) => scope.complete(),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    fn deprovision_locked(&self, instance_id: &str) -> BrokerResult<()> {
        let mut inner = self.locked();

        if inner.store.instance(instance_id).is_none() {
            return Err(BrokerError::InstanceNotFound(instance_id.to_string()));
        }

        if self.policy == DeprovisionPolicy::Strict
            && inner
                .store
                .bindings()
                .values()
                .any(|b| b.service_instance_id == instance_id)
        {
            return Err(BrokerError::OutstandingBindings(instance_id.to_string()));
        }

        inner.mounter.delete_share(instance_id)?;
        inner.store.remove_instance(instance_id)?;
        Ok(())
    }

    /// Binds an instance to a consumer and returns the volume-mount
    /// descriptor. The descriptor is derived from current mounter state
    /// and the request parameters; it is never stored, so an idempotent
    /// replay recomputes it (deterministic within a process) without
    /// mutating anything.
    pub fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        req: &BindRequest,
    ) -> BrokerResult<Outcome<BindResponse>> {
        let scope = OpScope::new(
            "BIND",
            &[("instance_id", instance_id), ("binding_id", binding_id)],
        );
        let result = self.bind_locked(instance_id, binding_id, req);
        match &result {
            Ok(_) => scope.complete(),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    fn bind_locked(
        &self,
        instance_id: &str,
        binding_id: &str,
        req: &BindRequest,
    ) -> BrokerResult<Outcome<BindResponse>> {
        let mut inner = self.locked();

        if inner.store.instance(instance_id).is_none() {
            return Err(BrokerError::InstanceNotFound(instance_id.to_string()));
        }

        if let Some(existing) = inner.store.binding(binding_id) {
            if conflict::binding_matches_request(existing, instance_id, req) {
                let response =
                    Self::assemble_bind_response(&self.identity, &inner.mounter, existing)?;
                return Ok(Outcome::Replayed(response));
            }
            return Err(BrokerError::BindingConflict(binding_id.to_string()));
        }

        let record = ServiceBinding::from_request(binding_id, instance_id, req);
        let response = Self::assemble_bind_response(&self.identity, &inner.mounter, &record)?;
        inner.store.put_binding(record)?;

        Ok(Outcome::Created(response))
    }

    fn assemble_bind_response(
        identity: &ServiceIdentity,
        mounter: &M,
        binding: &ServiceBinding,
    ) -> BrokerResult<BindResponse> {
        let mode = params::evaluate_mode(&binding.parameters)?;
        let container_dir =
            params::evaluate_container_dir(&binding.parameters, &binding.service_instance_id)?;
        let paths = mounter.share_paths(&binding.service_instance_id)?;
        let remote = mounter.remote_config()?;

        // remote_host may carry a port suffix; the driver wants the bare host
        let remote_info = remote
            .remote_host
            .split(':')
            .next()
            .unwrap_or("")
            .to_string();

        Ok(BindResponse {
            credentials: Credentials::default(),
            volume_mounts: vec![VolumeMount {
                container_dir,
                mode,
                driver: identity.driver_name(),
                device_type: "shared".to_string(),
                device: SharedDevice {
                    volume_id: binding.service_instance_id.clone(),
                    mount_config: MountConfig {
                        remote_info,
                        version: remote.version,
                        remote_mountpoint: paths.remote,
                        local_mountpoint: paths.cell,
                    },
                },
            }],
        })
    }

    /// Unbinds a consumer; the underlying share is left untouched.
    pub fn unbind(&self, instance_id: &str, binding_id: &str) -> BrokerResult<()> {
        let scope = OpScope::new(
            "UNBIND",
            &[("instance_id", instance_id), ("binding_id", binding_id)],
        );
        let result = self.unbind_locked(instance_id, binding_id);
        match &result {
            Ok(_) => scope.complete(),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    fn unbind_locked(&self, instance_id: &str, binding_id: &str) -> BrokerResult<()> {
        let mut inner = self.locked();

        if inner.store.instance(instance_id).is_none() {
            return Err(BrokerError::InstanceNotFound(instance_id.to_string()));
        }
        if inner.store.binding(binding_id).is_none() {
            return Err(BrokerError::BindingNotFound(binding_id.to_string()));
        }

        inner.store.remove_binding(binding_id)?;
        Ok(())
    }

    /// Pure lookup of a binding record. Binding ids are global keys, so
    /// the instance id is not consulted.
    pub fn binding(&self, binding_id: &str) -> BrokerResult<ServiceBinding> {
        let inner = self.locked();
        inner
            .store
            .binding(binding_id)
            .cloned()
            .ok_or_else(|| BrokerError::BindingNotFound(binding_id.to_string()))
    }

    /// Plan changes are not offered; invoking this is a contract error
    /// on the caller's side, reported as a typed failure.
    pub fn update(&self, _instance_id: &str) -> BrokerResult<()> {
        Err(BrokerError::NotImplemented("update"))
    }

    /// Asynchronous operation polling is not offered.
    pub fn last_operation(&self, _instance_id: &str) -> BrokerResult<()> {
        Err(BrokerError::NotImplemented("last_operation"))
    }
}

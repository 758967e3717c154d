//! In-memory maps mirrored to per-category JSON files

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{ServiceBinding, ServiceInstance};
use crate::observability::Logger;

use super::errors::{StoreError, StoreResult};

/// The two persisted record categories, one file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateCategory {
    Instances,
    Bindings,
}

impl StateCategory {
    pub fn file_name(&self) -> &'static str {
        match self {
            StateCategory::Instances => "service_instances.json",
            StateCategory::Bindings => "service_bindings.json",
        }
    }
}

impl fmt::Display for StateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateCategory::Instances => write!(f, "instance"),
            StateCategory::Bindings => write!(f, "binding"),
        }
    }
}

/// Durable record of provisioned instances and bindings.
///
/// The maps are the source of truth while the process runs; the files
/// exist so a restarted process resumes where the last one stopped. A
/// category file that is absent loads as an empty map. A file that
/// exists but cannot be read or parsed also loads as an empty map after
/// a logged warning, so in-memory state can legitimately start empty
/// even when a file is present on disk.
pub struct StateStore {
    state_dir: PathBuf,
    instances: BTreeMap<String, ServiceInstance>,
    bindings: BTreeMap<String, ServiceBinding>,
}

impl StateStore {
    /// Opens the store, creating `state_dir` if needed and loading both
    /// category files.
    pub fn open(state_dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(state_dir).map_err(|e| StoreError::CreateDir {
            path: state_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let instances = Self::load_category(state_dir, StateCategory::Instances);
        let bindings = Self::load_category(state_dir, StateCategory::Bindings);

        Logger::info(
            "STORE_LOADED",
            &[
                ("instances", &instances.len().to_string()),
                ("bindings", &bindings.len().to_string()),
                ("state_dir", &state_dir.display().to_string()),
            ],
        );

        Ok(Self {
            state_dir: state_dir.to_path_buf(),
            instances,
            bindings,
        })
    }

    fn load_category<T: DeserializeOwned>(
        state_dir: &Path,
        category: StateCategory,
    ) -> BTreeMap<String, T> {
        let path = state_dir.join(category.file_name());

        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                Logger::warn(
                    "STORE_READ_FAILED",
                    &[
                        ("path", &path.display().to_string()),
                        ("reason", &e.to_string()),
                    ],
                );
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(map) => map,
            Err(e) => {
                Logger::warn(
                    "STORE_PARSE_FAILED",
                    &[
                        ("path", &path.display().to_string()),
                        ("reason", &e.to_string()),
                    ],
                );
                BTreeMap::new()
            }
        }
    }

    fn persist_category<T: Serialize>(
        &self,
        category: StateCategory,
        map: &BTreeMap<String, T>,
    ) -> StoreResult<()> {
        let path = self.state_dir.join(category.file_name());

        let data = serde_json::to_string_pretty(map).map_err(|e| StoreError::Serialize {
            category,
            reason: e.to_string(),
        })?;

        fs::write(&path, data).map_err(|e| StoreError::Write {
            category,
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Logger::debug(
            "STORE_PERSISTED",
            &[
                ("category", &category.to_string()),
                ("records", &map.len().to_string()),
            ],
        );
        Ok(())
    }

    pub fn instance(&self, id: &str) -> Option<&ServiceInstance> {
        self.instances.get(id)
    }

    pub fn binding(&self, id: &str) -> Option<&ServiceBinding> {
        self.bindings.get(id)
    }

    pub fn instances(&self) -> &BTreeMap<String, ServiceInstance> {
        &self.instances
    }

    pub fn bindings(&self) -> &BTreeMap<String, ServiceBinding> {
        &self.bindings
    }

    /// Inserts an instance record and persists the instance map.
    ///
    /// On persist failure the insertion is rolled back before the error
    /// is returned, so the in-memory map never holds a record the file
    /// does not.
    pub fn put_instance(&mut self, instance: ServiceInstance) -> StoreResult<()> {
        let id = instance.id.clone();
        let previous = self.instances.insert(id.clone(), instance);

        if let Err(e) = self.persist_category(StateCategory::Instances, &self.instances) {
            match previous {
                Some(prev) => self.instances.insert(id, prev),
                None => self.instances.remove(&id),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Removes an instance record and persists the instance map.
    ///
    /// Rolls the removal back on persist failure.
    pub fn remove_instance(&mut self, id: &str) -> StoreResult<Option<ServiceInstance>> {
        let removed = match self.instances.remove(id) {
            Some(instance) => instance,
            None => return Ok(None),
        };

        if let Err(e) = self.persist_category(StateCategory::Instances, &self.instances) {
            self.instances.insert(id.to_string(), removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    /// Inserts a binding record and persists the binding map.
    ///
    /// Rolls the insertion back on persist failure.
    pub fn put_binding(&mut self, binding: ServiceBinding) -> StoreResult<()> {
        let id = binding.id.clone();
        let previous = self.bindings.insert(id.clone(), binding);

        if let Err(e) = self.persist_category(StateCategory::Bindings, &self.bindings) {
            match previous {
                Some(prev) => self.bindings.insert(id, prev),
                None => self.bindings.remove(&id),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Removes a binding record and persists the binding map.
    ///
    /// Rolls the removal back on persist failure.
    pub fn remove_binding(&mut self, id: &str) -> StoreResult<Option<ServiceBinding>> {
        let removed = match self.bindings.remove(id) {
            Some(binding) => binding,
            None => return Ok(None),
        };

        if let Err(e) = self.persist_category(StateCategory::Bindings, &self.bindings) {
            self.bindings.insert(id.to_string(), removed);
            return Err(e);
        }
        Ok(Some(removed))
    }
}

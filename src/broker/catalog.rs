//! Static catalog assembly

use crate::model::{Catalog, Service, ServicePlan};

/// Identity of the one service this broker advertises.
#[derive(Debug, Clone)]
pub struct ServiceIdentity {
    pub service_name: String,
    pub service_id: String,
    pub service_description: String,
    pub plan_name: String,
    pub plan_id: String,
    pub plan_description: String,
}

impl ServiceIdentity {
    /// Name of the volume driver consumers use to mount shares.
    pub fn driver_name(&self) -> String {
        format!("{}driver", self.service_name)
    }
}

impl Default for ServiceIdentity {
    fn default() -> Self {
        Self {
            service_name: "nfs".to_string(),
            service_id: "nfs-service-guid".to_string(),
            service_description: "NFS filesystem volume service, including share creation and volume mounts".to_string(),
            plan_name: "free".to_string(),
            plan_id: "free-plan-guid".to_string(),
            plan_description: "free nfs filesystem".to_string(),
        }
    }
}

/// Builds the catalog: one bindable service with one free plan,
/// requiring volume-mount support from the platform.
pub fn catalog_for(identity: &ServiceIdentity) -> Catalog {
    Catalog {
        services: vec![Service {
            id: identity.service_id.clone(),
            name: identity.service_name.clone(),
            description: identity.service_description.clone(),
            bindable: true,
            plan_updateable: false,
            tags: vec![identity.service_name.clone()],
            requires: vec!["volume_mount".to_string()],
            plans: vec![ServicePlan {
                id: identity.plan_id.clone(),
                name: identity.plan_name.clone(),
                description: identity.plan_description.clone(),
                free: true,
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_requires_volume_mount() {
        let catalog = catalog_for(&ServiceIdentity::default());
        let service = &catalog.services[0];
        assert!(service.bindable);
        assert!(!service.plan_updateable);
        assert_eq!(service.requires, vec!["volume_mount"]);
        assert_eq!(service.plans.len(), 1);
        assert!(service.plans[0].free);
    }

    #[test]
    fn test_driver_name_derives_from_service_name() {
        assert_eq!(ServiceIdentity::default().driver_name(), "nfsdriver");
    }
}

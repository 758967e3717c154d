//! Conflict classification for repeated lifecycle requests
//!
//! A repeated request with an id that matches an existing record is
//! either an idempotent replay (every exposed field equal, including
//! nested parameter maps) or a conflict. Equality is spelled out
//! field by field per record type so the conflict contract stays
//! auditable as the schema evolves; there is no partial match and no
//! merge.

use crate::model::{BindRequest, Parameters, ProvisionRequest, ServiceBinding, ServiceInstance};

/// True when a stored instance matches a repeated provision request on
/// every request-supplied field.
pub fn instance_matches_request(existing: &ServiceInstance, incoming: &ProvisionRequest) -> bool {
    existing.service_id == incoming.service_id
        && existing.plan_id == incoming.plan_id
        && existing.organization_guid == incoming.organization_guid
        && existing.space_guid == incoming.space_guid
        && parameters_match(&existing.parameters, &incoming.parameters)
}

/// True when a stored binding matches a repeated bind request on every
/// request-supplied field, including the instance it targets.
pub fn binding_matches_request(
    existing: &ServiceBinding,
    instance_id: &str,
    incoming: &BindRequest,
) -> bool {
    existing.service_instance_id == instance_id
        && existing.service_id == incoming.service_id
        && existing.service_plan_id == incoming.plan_id
        && existing.app_guid == incoming.app_guid
        && parameters_match(&existing.parameters, &incoming.parameters)
}

/// Key-by-key equality over parameter maps; value comparison is full
/// structural equality of the JSON values.
fn parameters_match(existing: &Parameters, incoming: &Parameters) -> bool {
    if existing.len() != incoming.len() {
        return false;
    }
    existing
        .iter()
        .all(|(key, value)| incoming.get(key) == Some(value))
}

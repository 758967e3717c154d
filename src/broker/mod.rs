//! Lifecycle controller for share instances and bindings
//!
//! Orchestrates the four lifecycle operations (provision, deprovision,
//! bind, unbind) over the mount client and the state store. Every
//! operation runs under one process-wide mutual-exclusion region that
//! spans validation, the mount side effect, and persistence.

mod catalog;
mod conflict;
mod controller;
mod errors;
mod params;

pub use catalog::ServiceIdentity;
pub use controller::{Broker, DASHBOARD_URL};
pub use errors::{BrokerError, BrokerResult};

use serde::{Deserialize, Serialize};

/// Whether deprovision refuses instances that still have bindings.
///
/// `Permissive` removes the instance and leaves any binding records
/// orphaned; `Strict` refuses until every binding is unbound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprovisionPolicy {
    #[default]
    Permissive,
    Strict,
}

/// Distinguishes a freshly created record from an idempotent replay of
/// an existing one, so the transport can answer 201 vs 200.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Created(T),
    Replayed(T),
}

impl<T> Outcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Outcome::Created(v) | Outcome::Replayed(v) => v,
        }
    }
}

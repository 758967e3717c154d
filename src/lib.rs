//! sharebroker - a service broker for NFS volume shares
//!
//! The broker exposes the standard resource-lifecycle contract
//! (provision, deprovision, bind, unbind) over HTTP and backs each
//! provisioned instance with one share directory under a single
//! remote filesystem mount.

pub mod broker;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod model;
pub mod mounter;
pub mod observability;
pub mod store;

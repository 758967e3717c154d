//! Observability subsystem for the share broker
//!
//! Structured JSON logging only: one log line = one event, deterministic
//! key ordering, synchronous writes. Every lifecycle operation, mounter
//! invocation, and store mutation logs through this module.
//!
//! # Usage
//!
//! ```ignore
//! use sharebroker::observability::{Logger, OpScope};
//!
//! Logger::info("STORE_LOADED", &[("instances", "3")]);
//!
//! let scope = OpScope::new("PROVISION", &[("instance_id", "i1")]);
//! // ... do work ...
//! scope.complete();
//! ```

mod logger;
mod scope;

pub use logger::{Logger, Severity};
pub use scope::OpScope;

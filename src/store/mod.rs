//! Durable state store for instance and binding records
//!
//! Two in-memory maps mirrored to one JSON file per category. Every
//! mutation rewrites the category file wholesale; there is no append log
//! and no partial update. Startup reloads whatever the files hold.

mod errors;
mod state;

pub use errors::{StoreError, StoreResult};
pub use state::{StateCategory, StateStore};

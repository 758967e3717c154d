//! HTTP transport for the share broker
//!
//! A thin axum layer over the lifecycle controller. Handlers translate
//! between wire JSON and controller calls; no lifecycle decision lives
//! here.
//!
//! # Endpoints
//!
//! - `GET /v2/catalog` - static service catalog
//! - `PUT/PATCH/DELETE /v2/service_instances/{id}` - instance lifecycle
//! - `PUT/GET/DELETE /v2/service_instances/{id}/service_bindings/{id}` -
//!   binding lifecycle
//! - `GET /health` - health check

pub mod broker_routes;
pub mod config;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;

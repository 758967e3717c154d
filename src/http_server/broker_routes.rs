//! Broker lifecycle HTTP routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;

use crate::broker::{Broker, BrokerError, Outcome};
use crate::model::{BindRequest, ProvisionRequest};
use crate::mounter::MountClient;

/// Structured error body returned for every failed operation.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub description: String,
}

impl From<&BrokerError> for ErrorBody {
    fn from(err: &BrokerError) -> Self {
        Self {
            error: err.kind().to_string(),
            description: err.to_string(),
        }
    }
}

fn error_response(err: &BrokerError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from(err))).into_response()
}

/// Deprovision and unbind report missing resources as 410 Gone.
fn error_response_gone_when_missing(err: &BrokerError) -> Response {
    match err {
        BrokerError::InstanceNotFound(_) | BrokerError::BindingNotFound(_) => {
            (StatusCode::GONE, Json(ErrorBody::from(err))).into_response()
        }
        _ => error_response(err),
    }
}

fn empty_body() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

/// Create the lifecycle routes.
pub fn broker_routes<M>(broker: Arc<Broker<M>>) -> Router
where
    M: MountClient + Send + 'static,
{
    Router::new()
        .route("/v2/catalog", get(catalog::<M>))
        .route(
            "/v2/service_instances/:instance_id",
            put(provision::<M>).patch(update::<M>).delete(deprovision::<M>),
        )
        .route(
            "/v2/service_instances/:instance_id/last_operation",
            get(last_operation::<M>),
        )
        .route(
            "/v2/service_instances/:instance_id/service_bindings/:binding_id",
            put(bind::<M>).get(get_binding::<M>).delete(unbind::<M>),
        )
        .with_state(broker)
}

async fn catalog<M>(State(broker): State<Arc<Broker<M>>>) -> impl IntoResponse
where
    M: MountClient + Send + 'static,
{
    (StatusCode::OK, Json(broker.catalog()))
}

async fn provision<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path(instance_id): Path<String>,
    Json(req): Json<ProvisionRequest>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.provision(&instance_id, &req) {
        Ok(Outcome::Created(resp)) => (StatusCode::CREATED, Json(resp)).into_response(),
        Ok(Outcome::Replayed(resp)) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn deprovision<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path(instance_id): Path<String>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.deprovision(&instance_id) {
        Ok(()) => (StatusCode::OK, empty_body()).into_response(),
        Err(e) => error_response_gone_when_missing(&e),
    }
}

async fn bind<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Json(req): Json<BindRequest>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.bind(&instance_id, &binding_id, &req) {
        Ok(Outcome::Created(resp)) => (StatusCode::CREATED, Json(resp)).into_response(),
        Ok(Outcome::Replayed(resp)) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn unbind<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.unbind(&instance_id, &binding_id) {
        Ok(()) => (StatusCode::OK, empty_body()).into_response(),
        Err(e) => error_response_gone_when_missing(&e),
    }
}

async fn get_binding<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path((_instance_id, binding_id)): Path<(String, String)>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.binding(&binding_id) {
        Ok(binding) => (StatusCode::OK, Json(binding)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn update<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path(instance_id): Path<String>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.update(&instance_id) {
        Ok(()) => (StatusCode::OK, empty_body()).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn last_operation<M>(
    State(broker): State<Arc<Broker<M>>>,
    Path(instance_id): Path<String>,
) -> Response
where
    M: MountClient + Send + 'static,
{
    match broker.last_operation(&instance_id) {
        Ok(()) => (StatusCode::OK, empty_body()).into_response(),
        Err(e) => error_response(&e),
    }
}

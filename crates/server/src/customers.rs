//! Customer HTTP endpoints.
//!
//! Handlers translate requests into service calls and service outcomes into status codes.
//! They perform no field validation of their own.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use grocery_core::domain::customer::{Customer, CustomerId};
use grocery_core::errors::{ApplicationError, InterfaceError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::service::CustomerService;

#[derive(Clone)]
pub struct CustomerState {
    service: Arc<CustomerService>,
}

/// `POST /customers` body. An `id` sent by the client is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// `PUT /customers` body. Missing or `null` fields fall through to validation.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub correlation_id: String,
}

type HandlerError = (StatusCode, Json<CustomerError>);

pub fn router(service: Arc<CustomerService>) -> Router {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer).put(update_customer))
        .route("/customers/{id}", get(get_customer).delete(delete_customer))
        .with_state(CustomerState { service })
}

async fn list_customers(
    State(state): State<CustomerState>,
) -> Result<Json<Vec<Customer>>, HandlerError> {
    let correlation_id = correlation_id();
    let customers = state
        .service
        .get_all()
        .await
        .map_err(|error| failure("list", error, &correlation_id))?;

    Ok(Json(customers))
}

async fn get_customer(
    Path(id): Path<i64>,
    State(state): State<CustomerState>,
) -> Result<Response, HandlerError> {
    let correlation_id = correlation_id();
    let customer = state
        .service
        .get_by_id(CustomerId(id))
        .await
        .map_err(|error| failure("get", error, &correlation_id))?;

    Ok(match customer {
        Some(customer) => Json(customer).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

async fn create_customer(
    State(state): State<CustomerState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, HandlerError> {
    let correlation_id = correlation_id();
    let Json(body) =
        body.map_err(|rejection| unreadable_body("create", rejection, &correlation_id))?;
    let created = state
        .service
        .add(Customer::unsaved(body.name.unwrap_or_default()))
        .await
        .map_err(|error| failure("create", error, &correlation_id))?;

    info!(
        event_name = "server.customers.created",
        correlation_id = %correlation_id,
        customer_id = %created.id,
        "customer created"
    );
    Ok(Json(created))
}

async fn update_customer(
    State(state): State<CustomerState>,
    body: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<StatusCode, HandlerError> {
    let correlation_id = correlation_id();
    let Json(body) =
        body.map_err(|rejection| unreadable_body("update", rejection, &correlation_id))?;
    let id = body.id.unwrap_or_default();
    state
        .service
        .update(Customer::new(id, body.name.unwrap_or_default()))
        .await
        .map_err(|error| failure("update", error, &correlation_id))?;

    info!(
        event_name = "server.customers.updated",
        correlation_id = %correlation_id,
        customer_id = id,
        "customer updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_customer(
    Path(id): Path<i64>,
    State(state): State<CustomerState>,
) -> Result<StatusCode, HandlerError> {
    let correlation_id = correlation_id();
    state
        .service
        .delete(CustomerId(id))
        .await
        .map_err(|error| failure("delete", error, &correlation_id))?;

    info!(
        event_name = "server.customers.deleted",
        correlation_id = %correlation_id,
        customer_id = id,
        "customer deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

fn correlation_id() -> String {
    format!("req-{}", Uuid::new_v4())
}

fn failure(operation: &'static str, error: ApplicationError, correlation_id: &str) -> HandlerError {
    match error.into_interface(correlation_id) {
        InterfaceError::BadRequest { violations, correlation_id } => {
            warn!(
                event_name = "server.customers.validation_failed",
                correlation_id = %correlation_id,
                operation,
                violations = ?violations,
                "customer request failed validation"
            );
            (
                StatusCode::BAD_REQUEST,
                Json(CustomerError { error: None, errors: violations, correlation_id }),
            )
        }
        InterfaceError::Rejected { message, correlation_id } => {
            warn!(
                event_name = "server.customers.rejected",
                correlation_id = %correlation_id,
                operation,
                reason = %message,
                "customer request rejected"
            );
            (StatusCode::BAD_REQUEST, Json(single(message, correlation_id)))
        }
        InterfaceError::NotFound { message, correlation_id } => {
            (StatusCode::NOT_FOUND, Json(single(message, correlation_id)))
        }
        internal @ InterfaceError::Internal { .. } => {
            error!(
                event_name = "server.customers.storage_failure",
                correlation_id = %internal.correlation_id(),
                operation,
                error = %internal,
                "customer request failed against the datastore"
            );
            let message = internal.user_message().to_string();
            let correlation_id = internal.correlation_id().to_string();
            (StatusCode::INTERNAL_SERVER_ERROR, Json(single(message, correlation_id)))
        }
    }
}

/// Bodies that are not JSON or carry a field of the wrong type keep axum's status code.
fn unreadable_body(
    operation: &'static str,
    rejection: JsonRejection,
    correlation_id: &str,
) -> HandlerError {
    let message = rejection.body_text();
    warn!(
        event_name = "server.customers.body_rejected",
        correlation_id = %correlation_id,
        operation,
        reason = %message,
        "customer request body could not be read"
    );
    (rejection.status(), Json(single(message, correlation_id.to_string())))
}

fn single(message: String, correlation_id: String) -> CustomerError {
    CustomerError { error: Some(message), errors: Vec::new(), correlation_id }
}

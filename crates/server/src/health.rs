use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use grocery_db::repositories::CustomerRepository;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    repository: Arc<dyn CustomerRepository>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub datastore: HealthCheck,
    pub checked_at: String,
}

pub fn router(repository: Arc<dyn CustomerRepository>) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { repository })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let datastore = datastore_check(state.repository.as_ref()).await;
    let ready = datastore.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "grocery-server runtime initialized".to_string(),
        },
        datastore,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn datastore_check(repository: &dyn CustomerRepository) -> HealthCheck {
    match repository.get_all().await {
        Ok(records) => HealthCheck {
            status: "ready",
            detail: format!("datastore readable ({} customers)", records.len()),
        },
        Err(error) => {
            HealthCheck { status: "degraded", detail: format!("datastore read failed: {error}") }
        }
    }
}

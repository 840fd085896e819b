use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use grocery_core::config::CorsConfig;
use grocery_db::repositories::CustomerRepository;
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::{customers, health, service::CustomerService};

const CORS_PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(600);

pub fn build(
    service: Arc<CustomerService>,
    repository: Arc<dyn CustomerRepository>,
    cors: &CorsConfig,
) -> Router {
    customers::router(service)
        .merge(health::router(repository))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .max_age(CORS_PREFLIGHT_MAX_AGE);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

fn handle_panic(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    error!(
        event_name = "server.request.panicked",
        correlation_id = "unassigned",
        panic = %detail,
        "request handler panicked"
    );

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "An unexpected internal error occurred." })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        routing::get,
        Router,
    };
    use grocery_core::config::CorsConfig;
    use grocery_db::repositories::InMemoryCustomerRepository;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::{build, handle_panic};
    use crate::service::CustomerService;

    fn app(cors: CorsConfig) -> Router {
        let repository = Arc::new(InMemoryCustomerRepository::default());
        build(Arc::new(CustomerService::new(repository.clone())), repository, &cors)
    }

    #[tokio::test]
    async fn health_and_customer_routes_are_both_mounted() {
        let app = app(CorsConfig::default());

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let customers = app
            .oneshot(Request::get("/customers").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(health.status(), StatusCode::OK);
        assert_eq!(customers.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn any_origin_is_allowed_when_unconfigured() {
        let response = app(CorsConfig::default())
            .oneshot(
                Request::get("/customers")
                    .header(header::ORIGIN, "https://anywhere.test")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
            Some(&b"*"[..])
        );
    }

    #[tokio::test]
    async fn configured_origins_restrict_preflight() {
        let cors = CorsConfig { allowed_origins: vec!["https://shop.example.com".to_string()] };
        let preflight = |origin: &'static str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/customers")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
                .body(Body::empty())
                .expect("request")
        };

        let allowed =
            app(cors.clone()).oneshot(preflight("https://shop.example.com")).await.expect("ok");
        let denied = app(cors).oneshot(preflight("https://evil.test")).await.expect("ok");

        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).map(|v| v.as_bytes()),
            Some(&b"https://shop.example.com"[..])
        );
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_MAX_AGE).map(|v| v.as_bytes()),
            Some(&b"600"[..])
        );
        assert!(denied.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn panics_become_generic_server_errors() {
        async fn explode() -> &'static str {
            panic!("datastore invariant broken")
        }
        let app = Router::new()
            .route("/boom", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.contains("An unexpected internal error occurred."));
        assert!(!body.contains("invariant"));
    }
}

//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::{http::HeaderName, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::store::EntityStore;

pub use routes::create_router;

/// Build the application router over `store`
pub fn build_app<S>(store: S) -> Router
where
    S: EntityStore + Clone + 'static,
{
    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    // Layers run outermost-last: request id -> trace -> context -> logging -> handler
    let api_router = create_router::<S>()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::context_middleware));

    Router::new()
        .route("/health", get(health_check))
        .merge(api_router)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(store)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

//! HTTP adapters - REST API implementations.

pub mod webhook;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use webhook::{webhook_routes, ApiError, WebhookAppState};

/// Builds the full application router with request tracing and request ids
/// (`x-request-id`).
///
/// A webhook's time limit is the orchestration run deadline, enforced by
/// the handler so that an overrun still answers with a JSON error body.
pub fn app_router(state: WebhookAppState) -> Router {
    webhook_routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

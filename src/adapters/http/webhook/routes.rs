//! Axum router configuration for webhook endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{health, receive_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `POST /webhook` - Email notification (requires `X-Client-State`)
/// - `GET /health` - Liveness probe, no auth
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/health", get(health))
}

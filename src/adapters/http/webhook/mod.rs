//! HTTP adapter for webhook intake and health checks.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, HealthResponse, WebhookResponse};
pub use handlers::{health, receive_webhook, ApiError, WebhookAppState};
pub use routes::webhook_routes;

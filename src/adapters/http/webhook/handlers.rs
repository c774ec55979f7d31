//! HTTP handlers for the webhook and health endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::{FailedRun, ProcessEmailCommand, ProcessEmailError, ProcessEmailHandler};
use crate::domain::webhook::{WebhookError, WebhookGate};

use super::dto::{ErrorResponse, HealthResponse, WebhookResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct WebhookAppState {
    pub gate: Arc<WebhookGate>,
    pub processor: Arc<ProcessEmailHandler>,
}

impl WebhookAppState {
    pub fn new(gate: WebhookGate, processor: ProcessEmailHandler) -> Self {
        Self {
            gate: Arc::new(gate),
            processor: Arc::new(processor),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Authenticate, parse and process an email notification
pub async fn receive_webhook(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let event = state.gate.admit(&headers, &body)?;

    tracing::info!(
        email_id = %event.email_id(),
        sender = %event.sender_address(),
        "Webhook admitted"
    );

    let processed = state
        .processor
        .handle(ProcessEmailCommand { event })
        .await?;

    Ok(Json(WebhookResponse::from(processed.result)))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts gate and run failures to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Webhook(WebhookError),
    Processing(ProcessEmailError),
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self::Webhook(err)
    }
}

impl From<ProcessEmailError> for ApiError {
    fn from(err: ProcessEmailError) -> Self {
        Self::Processing(err)
    }
}

impl From<FailedRun> for ApiError {
    fn from(failed: FailedRun) -> Self {
        Self::Processing(failed.error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::Webhook(err @ WebhookError::InvalidClientState) => {
                tracing::warn!("Rejected webhook: invalid client state");
                (err.status_code(), err.to_string())
            }
            ApiError::Webhook(err @ WebhookError::MalformedPayload(_)) => {
                tracing::warn!("Rejected webhook: {}", err);
                (err.status_code(), err.to_string())
            }
            ApiError::Processing(err) => {
                tracing::error!("Processing failed: {}", err);
                let message = match err {
                    ProcessEmailError::ReasoningEngine { .. } => "Reasoning engine failure",
                    ProcessEmailError::LoopBoundExceeded { .. } => {
                        "Tool loop exceeded maximum turns"
                    }
                    ProcessEmailError::DeadlineExceeded { .. } => "Processing deadline exceeded",
                    _ => "Internal server error",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

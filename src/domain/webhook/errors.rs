//! Webhook error types.

use http::StatusCode;
use thiserror::Error;

/// Reasons a webhook delivery is refused before processing starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// Shared-secret header missing or wrong.
    #[error("Invalid client state")]
    InvalidClientState,

    /// Body is not JSON or lacks the email identifier.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

impl WebhookError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload(reason.into())
    }

    /// Maps the error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidClientState => StatusCode::UNAUTHORIZED,
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        }
    }
}

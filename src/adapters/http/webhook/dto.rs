//! Response bodies for the webhook endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::email::{ProcessingResult, ProcessingStatus};
use crate::domain::foundation::Timestamp;

/// Body of a successful `POST /webhook`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub status: ProcessingStatus,
    pub result: ProcessingResult,
}

impl From<ProcessingResult> for WebhookResponse {
    fn from(result: ProcessingResult) -> Self {
        Self {
            status: result.status,
            result,
        }
    }
}

/// Flat error body; the only thing a caller sees on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Timestamp,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Timestamp::now(),
        }
    }
}

//! Business API Port - Interface for the downstream system that receives
//! structured data extracted from emails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ServiceError;

/// Port for delivering extracted data to the business API.
#[async_trait]
pub trait BusinessApi: Send + Sync {
    /// Send `data` to `endpoint`.
    async fn submit(
        &self,
        data: &serde_json::Map<String, serde_json::Value>,
        endpoint: &str,
    ) -> Result<DeliveryStatus, ServiceError>;
}

/// Outcome of a delivery as reported back to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    /// HTTP status returned by the business API.
    pub status: u16,
    /// Response body or message.
    pub response: String,
}

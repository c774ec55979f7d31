//! HTTP client for the downstream business API.
//!
//! Posts the extracted data as a JSON body to the resolved endpoint. Any
//! HTTP answer is reported back as a `DeliveryStatus`; only transport
//! failures become errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::ports::{BusinessApi, DeliveryStatus, ServiceError};

/// `BusinessApi` over plain HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpBusinessApi {
    client: Client,
    timeout: Duration,
}

impl HttpBusinessApi {
    pub fn new(timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl BusinessApi for HttpBusinessApi {
    async fn submit(
        &self,
        data: &Map<String, Value>,
        endpoint: &str,
    ) -> Result<DeliveryStatus, ServiceError> {
        tracing::debug!(endpoint = %endpoint, fields = data.len(), "Posting data to business API");

        let response = self
            .client
            .post(endpoint)
            .json(data)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    ServiceError::unavailable(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::invalid_response(e.to_string()))?;

        if status >= 400 {
            tracing::warn!(endpoint = %endpoint, status, "Business API answered with an error status");
        }

        Ok(DeliveryStatus {
            status,
            response: body,
        })
    }
}

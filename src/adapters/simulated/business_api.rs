use async_trait::async_trait;
use serde_json::{Map, Value};

use super::call_log::CallLog;
use crate::ports::{BusinessApi, DeliveryStatus, ServiceError};

/// Business API that accepts everything.
#[derive(Debug, Default)]
pub struct SimulatedBusinessApi {
    failure: Option<ServiceError>,
    submissions: CallLog<(Map<String, Value>, String)>,
}

impl SimulatedBusinessApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// An API whose every call fails with `error`.
    pub fn failing(error: ServiceError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Data and endpoint of recent submissions, in call order.
    pub fn submissions(&self) -> Vec<(Map<String, Value>, String)> {
        self.submissions.snapshot()
    }
}

#[async_trait]
impl BusinessApi for SimulatedBusinessApi {
    async fn submit(
        &self,
        data: &Map<String, Value>,
        endpoint: &str,
    ) -> Result<DeliveryStatus, ServiceError> {
        self.submissions.record((data.clone(), endpoint.to_string()));
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(DeliveryStatus {
            status: 200,
            response: "Data processed successfully".to_string(),
        })
    }
}

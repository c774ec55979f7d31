//! Shared-secret check and payload parsing for inbound webhooks.

use std::collections::BTreeMap;

use http::HeaderMap;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;
use crate::domain::email::InboundEvent;
use crate::domain::foundation::EmailId;

/// Header carrying the shared secret.
pub const CLIENT_STATE_HEADER: &str = "x-client-state";

/// Admits webhook deliveries that carry the configured shared secret.
///
/// The secret is checked before the body is looked at, so a bad secret is
/// always reported as [`WebhookError::InvalidClientState`] whatever the
/// payload contains.
pub struct WebhookGate {
    client_state: Secret<String>,
}

impl WebhookGate {
    pub fn new(client_state: Secret<String>) -> Self {
        Self { client_state }
    }

    /// Authenticates and parses one delivery.
    ///
    /// # Errors
    ///
    /// - `InvalidClientState` if the header is missing or does not match
    /// - `MalformedPayload` if the body is not JSON or `emailId` is absent
    pub fn admit(&self, headers: &HeaderMap, body: &[u8]) -> Result<InboundEvent, WebhookError> {
        self.verify_client_state(headers)?;

        let payload: NotificationPayload = serde_json::from_slice(body)
            .map_err(|e| WebhookError::malformed(format!("invalid JSON body: {}", e)))?;

        let email_id = payload
            .email_id
            .ok_or_else(|| WebhookError::malformed("missing emailId"))
            .and_then(|id| EmailId::new(id).map_err(|e| WebhookError::malformed(e.to_string())))?;

        let sender = payload
            .from
            .and_then(|f| f.email_address)
            .and_then(|a| a.address)
            .unwrap_or_default();

        Ok(
            InboundEvent::new(email_id, payload.subject.unwrap_or_default(), sender)
                .with_headers(retained_headers(headers)),
        )
    }

    fn verify_client_state(&self, headers: &HeaderMap) -> Result<(), WebhookError> {
        let provided = headers
            .get(CLIENT_STATE_HEADER)
            .ok_or(WebhookError::InvalidClientState)?;

        if constant_time_compare(
            provided.as_bytes(),
            self.client_state.expose_secret().as_bytes(),
        ) {
            Ok(())
        } else {
            Err(WebhookError::InvalidClientState)
        }
    }
}

impl std::fmt::Debug for WebhookGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookGate")
            .field("client_state", &"[REDACTED]")
            .finish()
    }
}

/// Notification body as sent by the mail server.
#[derive(Debug, Deserialize)]
struct NotificationPayload {
    #[serde(rename = "emailId")]
    email_id: Option<String>,
    subject: Option<String>,
    from: Option<Sender>,
}

#[derive(Debug, Deserialize)]
struct Sender {
    #[serde(rename = "emailAddress")]
    email_address: Option<EmailAddress>,
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    address: Option<String>,
}

/// Headers kept on the event: everything readable except the secret.
fn retained_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter(|(name, _)| name.as_str() != CLIENT_STATE_HEADER)
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

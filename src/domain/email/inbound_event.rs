//! Inbound notification about a newly received email.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::foundation::{EmailId, Timestamp};

/// A webhook notification that passed authentication and parsing.
///
/// `subject` and `sender_address` default to empty strings when the
/// notification omits them; only the email id is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InboundEvent {
    email_id: EmailId,
    subject: String,
    sender_address: String,
    headers: BTreeMap<String, String>,
    received_at: Timestamp,
}

impl InboundEvent {
    pub fn new(email_id: EmailId, subject: impl Into<String>, sender_address: impl Into<String>) -> Self {
        Self {
            email_id,
            subject: subject.into(),
            sender_address: sender_address.into(),
            headers: BTreeMap::new(),
            received_at: Timestamp::now(),
        }
    }

    /// Attaches the delivery headers (already stripped of the shared secret).
    pub fn with_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn email_id(&self) -> &EmailId {
        &self.email_id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn sender_address(&self) -> &str {
        &self.sender_address
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn received_at(&self) -> &Timestamp {
        &self.received_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_event_has_no_headers() {
        let event = InboundEvent::new(EmailId::new("123").unwrap(), "Invoice", "a@b.com");

        assert_eq!(event.email_id().as_str(), "123");
        assert_eq!(event.subject(), "Invoice");
        assert_eq!(event.sender_address(), "a@b.com");
        assert!(event.headers().is_empty());
    }

    #[test]
    fn with_headers_replaces_headers() {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let event = InboundEvent::new(EmailId::new("1").unwrap(), "", "").with_headers(headers);

        assert_eq!(event.headers()["content-type"], "application/json");
    }
}

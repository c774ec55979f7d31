//! Handlers behind the three email tools.
//!
//! Each handler parses its already-validated arguments into a typed struct,
//! calls the matching collaborator port and returns the payload the engine
//! will see.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::domain::tools::{GetEmailContentArgs, MarkEmailProcessedArgs, SendToApiArgs};
use crate::ports::{BusinessApi, MailboxService, ServiceError, ToolFault, ToolHandler};

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolFault> {
    serde_json::from_value(arguments).map_err(|e| ToolFault::invalid_arguments(e.to_string()))
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, ToolFault> {
    serde_json::to_value(value)
        .map_err(|e| ToolFault::Service(ServiceError::invalid_response(e.to_string())))
}

/// `get_email_content`: fetches an email body from the mailbox.
pub struct GetEmailContentTool {
    mailbox: Arc<dyn MailboxService>,
}

impl GetEmailContentTool {
    pub fn new(mailbox: Arc<dyn MailboxService>) -> Self {
        Self { mailbox }
    }
}

#[async_trait]
impl ToolHandler for GetEmailContentTool {
    async fn invoke(&self, arguments: Value) -> Result<Value, ToolFault> {
        let args: GetEmailContentArgs = parse_args(arguments)?;
        let content = self
            .mailbox
            .get_email_content(&args.email_id, args.format)
            .await?;
        to_payload(&content)
    }
}

/// Business API endpoints `send_to_api` may deliver to.
///
/// The configured endpoint is the default. An endpoint named by the engine
/// is accepted only when it lies under the configured endpoint or under one
/// of the extra allowed endpoints: same scheme, host and port, and a path
/// at or below the allowed path.
#[derive(Debug, Clone)]
pub struct EndpointPolicy {
    default_endpoint: String,
    allowed: Vec<Url>,
}

impl EndpointPolicy {
    pub fn new(default_endpoint: impl Into<String>) -> Self {
        let default_endpoint = default_endpoint.into();
        let allowed = Url::parse(&default_endpoint).into_iter().collect();
        Self {
            default_endpoint,
            allowed,
        }
    }

    /// Adds endpoints the engine may target besides the default.
    /// Entries that are not absolute URLs are ignored.
    pub fn with_allowed<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed.extend(
            endpoints
                .into_iter()
                .filter_map(|e| Url::parse(e.as_ref()).ok()),
        );
        self
    }

    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    /// Picks the endpoint for one call.
    pub fn resolve<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str, ToolFault> {
        let requested = match requested.map(str::trim).filter(|e| !e.is_empty()) {
            None => return Ok(self.default_endpoint.as_str()),
            Some(endpoint) => endpoint,
        };

        let permitted = Url::parse(requested)
            .map(|url| self.allowed.iter().any(|base| is_under(base, &url)))
            .unwrap_or(false);

        if permitted {
            Ok(requested)
        } else {
            Err(ToolFault::invalid_arguments(format!(
                "endpoint '{}' is not an allowed business API endpoint",
                requested
            )))
        }
    }
}

impl From<&str> for EndpointPolicy {
    fn from(default_endpoint: &str) -> Self {
        Self::new(default_endpoint)
    }
}

impl From<String> for EndpointPolicy {
    fn from(default_endpoint: String) -> Self {
        Self::new(default_endpoint)
    }
}

fn is_under(base: &Url, candidate: &Url) -> bool {
    if base.scheme() != candidate.scheme()
        || base.host_str() != candidate.host_str()
        || base.port_or_known_default() != candidate.port_or_known_default()
        || !candidate.username().is_empty()
        || candidate.password().is_some()
    {
        return false;
    }

    let base_path = base.path().trim_end_matches('/');
    let path = candidate.path();
    path == base_path
        || path
            .strip_prefix(base_path)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// `send_to_api`: delivers extracted data to the business API.
///
/// Uses the configured endpoint when the engine does not name one.
pub struct SendToApiTool {
    api: Arc<dyn BusinessApi>,
    endpoints: EndpointPolicy,
}

impl SendToApiTool {
    pub fn new(api: Arc<dyn BusinessApi>, endpoints: impl Into<EndpointPolicy>) -> Self {
        Self {
            api,
            endpoints: endpoints.into(),
        }
    }
}

#[async_trait]
impl ToolHandler for SendToApiTool {
    async fn invoke(&self, arguments: Value) -> Result<Value, ToolFault> {
        let args: SendToApiArgs = parse_args(arguments)?;
        let endpoint = self.endpoints.resolve(args.endpoint.as_deref())?;
        let status = self.api.submit(&args.data, endpoint).await?;
        to_payload(&status)
    }
}

/// `mark_email_processed`: flags an email as handled in the mailbox.
pub struct MarkEmailProcessedTool {
    mailbox: Arc<dyn MailboxService>,
}

impl MarkEmailProcessedTool {
    pub fn new(mailbox: Arc<dyn MailboxService>) -> Self {
        Self { mailbox }
    }
}

#[async_trait]
impl ToolHandler for MarkEmailProcessedTool {
    async fn invoke(&self, arguments: Value) -> Result<Value, ToolFault> {
        let args: MarkEmailProcessedArgs = parse_args(arguments)?;
        let ack = self.mailbox.mark_email_processed(&args.email_id).await?;
        to_payload(&ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::simulated::{SimulatedBusinessApi, SimulatedMailbox};
    use crate::domain::tools::EmailFormat;
    use serde_json::json;

    #[tokio::test]
    async fn get_email_content_defaults_to_text() {
        let mailbox = Arc::new(SimulatedMailbox::new());
        let tool = GetEmailContentTool::new(mailbox.clone());

        let payload = tool.invoke(json!({ "emailId": "123" })).await.unwrap();

        assert_eq!(payload["format"], "text");
        assert_eq!(
            mailbox.content_requests(),
            vec![("123".to_string(), EmailFormat::Text)]
        );
    }

    #[tokio::test]
    async fn get_email_content_passes_requested_format() {
        let mailbox = Arc::new(SimulatedMailbox::new());
        let tool = GetEmailContentTool::new(mailbox.clone());

        let payload = tool
            .invoke(json!({ "emailId": "123", "format": "html" }))
            .await
            .unwrap();

        assert_eq!(payload["format"], "html");
        assert_eq!(payload["content"], "Example email content...");
    }

    #[tokio::test]
    async fn send_to_api_uses_default_endpoint() {
        let api = Arc::new(SimulatedBusinessApi::new());
        let tool = SendToApiTool::new(api.clone(), "https://api.example.com/emails");

        let payload = tool
            .invoke(json!({ "data": { "invoice": "99" } }))
            .await
            .unwrap();

        assert_eq!(payload["status"], 200);
        let calls = api.submissions();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "https://api.example.com/emails");
        assert_eq!(calls[0].0["invoice"], "99");
    }

    #[tokio::test]
    async fn send_to_api_accepts_endpoint_under_the_configured_one() {
        let api = Arc::new(SimulatedBusinessApi::new());
        let tool = SendToApiTool::new(api.clone(), "https://api.example.com/emails");

        tool.invoke(json!({ "data": {}, "endpoint": "https://api.example.com/emails/urgent" }))
            .await
            .unwrap();

        assert_eq!(api.submissions()[0].1, "https://api.example.com/emails/urgent");
    }

    #[tokio::test]
    async fn send_to_api_accepts_allowlisted_endpoint() {
        let api = Arc::new(SimulatedBusinessApi::new());
        let policy = EndpointPolicy::new("https://api.example.com/emails")
            .with_allowed(["https://crm.example.com/hooks"]);
        let tool = SendToApiTool::new(api.clone(), policy);

        tool.invoke(json!({ "data": {}, "endpoint": "https://crm.example.com/hooks/invoices" }))
            .await
            .unwrap();

        assert_eq!(api.submissions()[0].1, "https://crm.example.com/hooks/invoices");
    }

    #[tokio::test]
    async fn send_to_api_rejects_endpoint_outside_the_allowlist() {
        let api = Arc::new(SimulatedBusinessApi::new());
        let tool = SendToApiTool::new(api.clone(), "https://api.example.com/emails");

        for endpoint in [
            "http://169.254.169.254/latest/meta-data",
            "https://api.example.com.evil.test/emails",
            "http://api.example.com/emails",
            "https://api.example.com/emailsx",
            "https://api.example.com/admin",
            "https://user:pw@api.example.com/emails",
            "not a url",
        ] {
            let err = tool
                .invoke(json!({ "data": { "k": 1 }, "endpoint": endpoint }))
                .await
                .unwrap_err();
            assert!(matches!(err, ToolFault::InvalidArguments(_)), "{}", endpoint);
        }
        assert!(api.submissions().is_empty());
    }

    #[test]
    fn blank_endpoint_falls_back_to_default() {
        let policy = EndpointPolicy::new("https://api.example.com/emails");
        assert_eq!(policy.resolve(Some("  ")).unwrap(), "https://api.example.com/emails");
        assert_eq!(policy.resolve(None).unwrap(), policy.default_endpoint());
    }

    #[tokio::test]
    async fn mark_email_processed_acknowledges() {
        let mailbox = Arc::new(SimulatedMailbox::new());
        let tool = MarkEmailProcessedTool::new(mailbox.clone());

        let payload = tool.invoke(json!({ "emailId": "123" })).await.unwrap();

        assert_eq!(payload, json!({ "success": true, "emailId": "123" }));
        assert_eq!(mailbox.processed_ids(), vec!["123".to_string()]);
    }

    #[tokio::test]
    async fn unparseable_arguments_are_reported() {
        let tool = MarkEmailProcessedTool::new(Arc::new(SimulatedMailbox::new()));

        let err = tool.invoke(json!({ "emailId": 5 })).await.unwrap_err();
        assert!(matches!(err, ToolFault::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn collaborator_failures_surface_as_service_faults() {
        let mailbox = Arc::new(SimulatedMailbox::failing(ServiceError::unavailable("down")));
        let tool = GetEmailContentTool::new(mailbox);

        let err = tool.invoke(json!({ "emailId": "1" })).await.unwrap_err();
        assert_eq!(err, ToolFault::Service(ServiceError::unavailable("down")));
    }
}

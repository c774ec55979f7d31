//! Mailbox backed by the mail server's MCP endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::client::McpClient;
use crate::domain::tools::EmailFormat;
use crate::ports::{EmailContent, MailboxService, ProcessedAck, ServiceError};

/// MailboxService forwarding to MCP tools of the same name.
pub struct McpMailbox {
    client: Arc<McpClient>,
}

impl McpMailbox {
    pub fn new(client: Arc<McpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MailboxService for McpMailbox {
    async fn get_email_content(
        &self,
        email_id: &str,
        format: EmailFormat,
    ) -> Result<EmailContent, ServiceError> {
        let output = self
            .client
            .call_tool(
                "get_email_content",
                json!({ "emailId": email_id, "format": format.as_str() }),
            )
            .await?;

        if output.is_error {
            return Err(ServiceError::rejected(502, output.text));
        }

        let content = output
            .structured
            .as_ref()
            .and_then(|v| v.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_string)
            .unwrap_or(output.text);

        Ok(EmailContent { content, format })
    }

    async fn mark_email_processed(&self, email_id: &str) -> Result<ProcessedAck, ServiceError> {
        let output = self
            .client
            .call_tool("mark_email_processed", json!({ "emailId": email_id }))
            .await?;

        let success = !output.is_error
            && output
                .structured
                .as_ref()
                .and_then(|v| v.get("success"))
                .and_then(|s| s.as_bool())
                .unwrap_or(true);

        Ok(ProcessedAck {
            success,
            email_id: email_id.to_string(),
        })
    }
}

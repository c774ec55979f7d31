//! Mailbox Service Port - Interface for the mail server.
//!
//! Backs the `get_email_content` and `mark_email_processed` tools.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::tools::EmailFormat;

/// Port for reading and flagging emails on the mail server.
#[async_trait]
pub trait MailboxService: Send + Sync {
    /// Fetch the body of an email in the requested format.
    async fn get_email_content(
        &self,
        email_id: &str,
        format: EmailFormat,
    ) -> Result<EmailContent, ServiceError>;

    /// Mark an email as processed/read.
    async fn mark_email_processed(&self, email_id: &str) -> Result<ProcessedAck, ServiceError>;
}

/// Body of an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub content: String,
    pub format: EmailFormat,
}

/// Acknowledgement returned after marking an email processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedAck {
    pub success: bool,
    pub email_id: String,
}

/// Errors from external tool collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Collaborator could not be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Collaborator answered with an error.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Collaborator reply could not be understood.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Collaborator did not answer in time.
    #[error("timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ServiceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }
}

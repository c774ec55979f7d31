//! Tool Handler Port - Interface for the code behind one tool.
//!
//! The executor validates arguments against the tool's declaration and then
//! hands them to the registered handler. Handlers talk to the external
//! collaborators ([`MailboxService`](super::MailboxService),
//! [`BusinessApi`](super::BusinessApi)).

use async_trait::async_trait;
use thiserror::Error;

use super::ServiceError;

/// Port for invoking one tool with already-validated arguments.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Runs the tool and returns its JSON payload.
    async fn invoke(&self, arguments: serde_json::Value) -> Result<serde_json::Value, ToolFault>;
}

/// Errors raised while invoking a tool.
///
/// The executor turns these into error payloads for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolFault {
    /// Arguments passed schema validation but could not be interpreted.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The external collaborator failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ToolFault {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments(message.into())
    }
}

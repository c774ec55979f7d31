//! Tool call request value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CallId;

/// A request from the reasoning engine to invoke a tool.
///
/// Arguments are kept as raw JSON; they are validated against the tool's
/// declared schema by the executor, not here.
///
/// # Examples
///
/// ```
/// use mailflow::domain::foundation::CallId;
/// use mailflow::domain::tools::ToolCallRequest;
///
/// let call = ToolCallRequest::new(
///     CallId::new("call_1").unwrap(),
///     "get_email_content",
///     serde_json::json!({ "emailId": "123", "format": "text" }),
/// );
/// assert_eq!(call.tool_name(), "get_email_content");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Identifier assigned by the engine, echoed on the result
    call_id: CallId,

    /// Name of the tool to invoke
    tool_name: String,

    /// Arguments for the tool (normally a JSON object)
    arguments: serde_json::Value,
}

impl ToolCallRequest {
    /// Creates a new tool call request.
    pub fn new(call_id: CallId, tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Returns the call id.
    pub fn call_id(&self) -> &CallId {
        &self.call_id
    }

    /// Returns the tool name.
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &serde_json::Value {
        &self.arguments
    }
}

//! Tool call result value objects.
//!
//! A result always answers exactly one request and carries its call id.
//! Failures are represented as data so they can be reported back to the
//! reasoning engine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CallId;

/// Category of a tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    /// No tool is registered under the requested name
    UnknownTool,

    /// Arguments did not match the declared parameter schema
    InvalidArguments,

    /// The external collaborator behind the tool failed
    ExecutionFailed,

    /// The external collaborator did not answer in time
    Timeout,
}

impl ToolErrorKind {
    /// Returns a human-readable description of the failure category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::UnknownTool => "Tool is not registered",
            Self::InvalidArguments => "Tool arguments failed validation",
            Self::ExecutionFailed => "Tool execution failed",
            Self::Timeout => "Tool execution timed out",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Error payload of a failed tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Payload of a tool call: either the tool's output or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "payload", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success(serde_json::Value),
    Failure(ToolError),
}

/// Result of executing one tool call request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    call_id: CallId,
    tool_name: String,
    outcome: ToolOutcome,
}

impl ToolCallResult {
    /// Creates a successful result.
    pub fn success(call_id: CallId, tool_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Success(payload),
        }
    }

    /// Creates a failed result.
    pub fn failure(
        call_id: CallId,
        tool_name: impl Into<String>,
        kind: ToolErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            call_id,
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Failure(ToolError::new(kind, message)),
        }
    }

    pub fn call_id(&self) -> &CallId {
        &self.call_id
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn outcome(&self) -> &ToolOutcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success(_))
    }

    /// Returns the error payload, if the call failed.
    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Failure(err) => Some(err),
            ToolOutcome::Success(_) => None,
        }
    }

    /// Renders the payload as the text content of a tool-result message.
    ///
    /// Successful payloads are sent verbatim as JSON. Failures become
    /// `{"error": <message>, "kind": <kind>}` so the engine can react.
    pub fn to_content(&self) -> String {
        let value = match &self.outcome {
            ToolOutcome::Success(payload) => payload.clone(),
            ToolOutcome::Failure(err) => serde_json::json!({
                "error": err.message,
                "kind": err.kind,
            }),
        };
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call_id() -> CallId {
        CallId::new("call_1").unwrap()
    }

    #[test]
    fn success_result_carries_payload() {
        let result = ToolCallResult::success(call_id(), "get_email_content", json!({"content": "hi"}));

        assert!(result.is_success());
        assert!(result.error().is_none());
        assert_eq!(result.call_id().as_str(), "call_1");
        assert_eq!(result.to_content(), r#"{"content":"hi"}"#);
    }

    #[test]
    fn failure_result_renders_error_object() {
        let result = ToolCallResult::failure(
            call_id(),
            "delete_everything",
            ToolErrorKind::UnknownTool,
            "Unknown tool: delete_everything",
        );

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::UnknownTool);

        let content: serde_json::Value = serde_json::from_str(&result.to_content()).unwrap();
        assert_eq!(content["error"], "Unknown tool: delete_everything");
        assert_eq!(content["kind"], "unknown_tool");
    }

    #[test]
    fn error_kind_serializes_to_snake_case() {
        let json = serde_json::to_string(&ToolErrorKind::InvalidArguments).unwrap();
        assert_eq!(json, "\"invalid_arguments\"");
    }

    #[test]
    fn error_kind_display_uses_description() {
        let kind = ToolErrorKind::Timeout;
        assert_eq!(format!("{}", kind), kind.description());
    }
}

use thiserror::Error;

use crate::domain::foundation::CallId;

/// Violations of conversation ordering rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("{pending} tool result(s) still pending; cannot append another assistant turn")]
    ToolResultsPending { pending: usize },

    #[error("call id {0} was already used in this conversation")]
    DuplicateCallId(CallId),

    #[error("no tool calls are pending")]
    NoPendingToolCalls,

    #[error("expected {expected} tool result(s), got {actual}")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("tool result out of order: expected call id {expected}, got {actual}")]
    UnexpectedCallId { expected: CallId, actual: CallId },
}

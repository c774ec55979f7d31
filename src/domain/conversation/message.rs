//! Message types making up a conversation.

use serde::Serialize;

use crate::domain::foundation::CallId;
use crate::domain::tools::{ToolCallRequest, ToolCallResult};

/// One assistant response from the reasoning engine.
///
/// Carries optional text and the tool calls the engine wants made, in the
/// order the engine listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssistantTurn {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl AssistantTurn {
    /// A final answer with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A turn that only requests tools.
    pub fn tool_calls(tool_calls: Vec<ToolCallRequest>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }

    pub fn requests_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCallRequest>,
    },
    Tool {
        call_id: CallId,
        result: ToolCallResult,
    },
}

impl Message {
    /// Role name as used on the wire.
    pub fn role(&self) -> &'static str {
        match self {
            Self::System { .. } => "system",
            Self::User { .. } => "user",
            Self::Assistant { .. } => "assistant",
            Self::Tool { .. } => "tool",
        }
    }

    /// Text content, for message kinds that carry text.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } => Some(content),
            Self::Assistant { content, .. } => content.as_deref(),
            Self::Tool { .. } => None,
        }
    }
}

impl From<AssistantTurn> for Message {
    fn from(turn: AssistantTurn) -> Self {
        Self::Assistant {
            content: turn.content,
            tool_calls: turn.tool_calls,
        }
    }
}

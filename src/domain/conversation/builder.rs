//! The append-only conversation log.

use std::collections::HashSet;

use serde::Serialize;

use super::errors::ConversationError;
use super::message::{AssistantTurn, Message};
use super::prompt::render_user_turn;
use crate::domain::email::InboundEvent;
use crate::domain::foundation::CallId;
use crate::domain::tools::{ToolCallRequest, ToolCallResult};

/// Ordered message log for one orchestration run.
///
/// # Invariants
///
/// - The first message is the system prompt and is never changed
/// - Order is system, user, then (assistant, tool result*)*
/// - Every tool call of an assistant turn is answered, in request order,
///   before another assistant turn may be appended
/// - A call id is never used twice
#[derive(Debug, Clone, Serialize)]
pub struct Conversation {
    messages: Vec<Message>,
    #[serde(skip)]
    issued_call_ids: HashSet<CallId>,
    #[serde(skip)]
    pending: Vec<CallId>,
}

impl Conversation {
    /// Starts a conversation with the system prompt and the user turn
    /// describing `event`.
    pub fn seed(system_prompt: impl Into<String>, event: &InboundEvent) -> Self {
        Self {
            messages: vec![
                Message::System {
                    content: system_prompt.into(),
                },
                Message::User {
                    content: render_user_turn(event),
                },
            ],
            issued_call_ids: HashSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends an assistant turn.
    ///
    /// Fails if results of the previous turn are still outstanding, or if
    /// the turn reuses a call id (within itself or from earlier turns).
    pub fn append_assistant_turn(&mut self, turn: AssistantTurn) -> Result<(), ConversationError> {
        if !self.pending.is_empty() {
            return Err(ConversationError::ToolResultsPending {
                pending: self.pending.len(),
            });
        }

        let mut seen = HashSet::with_capacity(turn.tool_calls.len());
        for call in &turn.tool_calls {
            let id = call.call_id();
            if self.issued_call_ids.contains(id) || !seen.insert(id.clone()) {
                return Err(ConversationError::DuplicateCallId(id.clone()));
            }
        }

        self.pending = turn.tool_calls.iter().map(|c| c.call_id().clone()).collect();
        self.issued_call_ids.extend(seen);
        self.messages.push(turn.into());
        Ok(())
    }

    /// Tool calls of the last assistant turn that have not been answered.
    pub fn pending_tool_calls(&self) -> &[ToolCallRequest] {
        if self.pending.is_empty() {
            return &[];
        }
        match self.messages.last() {
            Some(Message::Assistant { tool_calls, .. }) => tool_calls,
            _ => &[],
        }
    }

    /// Appends one tool-result message per result.
    ///
    /// `results` must answer every pending call, in the order the calls
    /// were issued. Nothing is appended on error.
    pub fn append_tool_results(
        &mut self,
        results: Vec<ToolCallResult>,
    ) -> Result<(), ConversationError> {
        if self.pending.is_empty() {
            return Err(ConversationError::NoPendingToolCalls);
        }
        if results.len() != self.pending.len() {
            return Err(ConversationError::ResultCountMismatch {
                expected: self.pending.len(),
                actual: results.len(),
            });
        }
        if let Some((expected, result)) = self
            .pending
            .iter()
            .zip(&results)
            .find(|(expected, result)| result.call_id() != *expected)
        {
            return Err(ConversationError::UnexpectedCallId {
                expected: expected.clone(),
                actual: result.call_id().clone(),
            });
        }

        self.pending.clear();
        self.messages
            .extend(results.into_iter().map(|result| Message::Tool {
                call_id: result.call_id().clone(),
                result,
            }));
        Ok(())
    }

    /// Text of the most recent assistant message, if it has any.
    pub fn last_assistant_content(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant { content, .. } => Some(content.as_deref()),
            _ => None,
        })?
    }

    /// Number of tool-result messages in the log.
    pub fn tool_result_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| matches!(m, Message::Tool { .. }))
            .count()
    }

    /// Number of tool calls issued across all assistant turns.
    pub fn tool_call_count(&self) -> usize {
        self.issued_call_ids.len()
    }
}

//! AI Provider Port - Interface for the reasoning engine.
//!
//! This port abstracts the tool-calling chat completion that drives the
//! orchestration loop, so the loop can run against OpenAI in production and
//! a scripted provider in tests.
//!
//! # Design
//!
//! - One non-streaming call per turn
//! - The full conversation and the full tool menu are sent every time
//! - Tool selection is left to the engine (`ToolChoice::Auto`)
//! - Failures are typed; the loop treats every one as fatal for the run
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct FixedProvider;
//!
//! #[async_trait]
//! impl AIProvider for FixedProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         Ok(CompletionResponse::new(AssistantTurn::text("Nothing to do"), "fixed"))
//!     }
//!
//!     fn provider_info(&self) -> ProviderInfo {
//!         ProviderInfo::new("fixed", "fixed")
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::{AssistantTurn, Message};
use crate::domain::foundation::{EmailId, RunId};
use crate::domain::tools::ToolDefinition;

/// Port for the reasoning engine.
///
/// Implementations translate the conversation and tool menu to a provider's
/// wire format and the reply back into an [`AssistantTurn`].
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Produce the next assistant turn for the conversation.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Provider name and model, logged at startup.
    fn provider_info(&self) -> ProviderInfo;
}

/// Tool selection policy sent with a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Engine decides whether and which tools to call
    #[default]
    Auto,
}

impl ToolChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
        }
    }
}

/// Request for one reasoning-engine turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Full conversation so far, system message first.
    pub messages: Vec<Message>,
    /// Tool menu, in registry order.
    pub tools: Vec<ToolDefinition>,
    /// Tool selection policy.
    pub tool_choice: ToolChoice,
    /// Temperature for response randomness.
    pub temperature: Option<f32>,
    /// Request metadata for tracing.
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
            temperature: None,
            metadata,
        }
    }

    /// Sets the conversation.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Sets the tool menu.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the tool selection policy.
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Request metadata for tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMetadata {
    /// Run this call belongs to.
    pub run_id: RunId,
    /// Email being processed.
    pub email_id: EmailId,
    /// 1-based turn number within the run.
    pub turn: u32,
}

impl RequestMetadata {
    pub fn new(run_id: RunId, email_id: EmailId, turn: u32) -> Self {
        Self {
            run_id,
            email_id,
            turn,
        }
    }
}

/// Response from the reasoning engine.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The assistant turn (text and/or tool calls).
    pub turn: AssistantTurn,
    /// Token usage.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

impl CompletionResponse {
    /// Creates a response, deriving the finish reason from the turn.
    pub fn new(turn: AssistantTurn, model: impl Into<String>) -> Self {
        let finish_reason = if turn.requests_tools() {
            FinishReason::ToolCalls
        } else {
            FinishReason::Stop
        };
        Self {
            turn,
            usage: TokenUsage::zero(),
            model: model.into(),
            finish_reason,
        }
    }

    /// Sets token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Creates new token usage.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }

    /// Creates zero usage.
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Model wants tools called.
    ToolCalls,
    /// Hit max_tokens limit.
    Length,
    /// Content was filtered for safety.
    ContentFilter,
    /// An error occurred.
    Error,
}

/// Provider identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g., "openai").
    pub name: String,
    /// Model identifier (e.g., "gpt-4-1106-preview").
    pub model: String,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Context (prompt + history) exceeds model limit.
    #[error("context too long: {tokens} tokens exceeds {max} limit")]
    ContextTooLong {
        /// Actual token count.
        tokens: u32,
        /// Maximum allowed.
        max: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates a context too long error.
    pub fn context_too_long(tokens: u32, max: u32) -> Self {
        Self::ContextTooLong { tokens, max }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u32) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Returns true if the failure is transient.
    ///
    /// Reported in the run-failure log. The loop never retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CallId;
    use crate::domain::tools::ToolCallRequest;

    fn test_metadata() -> RequestMetadata {
        RequestMetadata::new(RunId::new(), EmailId::new("123").unwrap(), 1)
    }

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new(test_metadata())
            .with_messages(vec![Message::User {
                content: "Hello".into(),
            }])
            .with_tools(vec![ToolDefinition::new(
                "t",
                "d",
                serde_json::json!({"type": "object"}),
            )])
            .with_temperature(0.7);

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.tool_choice, ToolChoice::Auto);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.metadata.turn, 1);
    }

    #[test]
    fn response_finish_reason_follows_turn() {
        let text = CompletionResponse::new(AssistantTurn::text("done"), "m");
        assert_eq!(text.finish_reason, FinishReason::Stop);

        let call = ToolCallRequest::new(CallId::new("c").unwrap(), "t", serde_json::json!({}));
        let tools = CompletionResponse::new(AssistantTurn::tool_calls(vec![call]), "m");
        assert_eq!(tools.finish_reason, FinishReason::ToolCalls);
    }

    #[test]
    fn token_usage_calculates_total() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
        assert_eq!(TokenUsage::zero().total_tokens, 0);
    }

    #[test]
    fn ai_error_transient_classification() {
        assert!(AIError::rate_limited(30).is_transient());
        assert!(AIError::unavailable("down").is_transient());
        assert!(AIError::network("reset").is_transient());
        assert!(AIError::timeout(30).is_transient());
        assert!(!AIError::AuthenticationFailed.is_transient());
        assert!(!AIError::context_too_long(100, 50).is_transient());
        assert!(!AIError::parse("bad json").is_transient());
    }

    #[test]
    fn tool_choice_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ToolChoice::Auto).unwrap(), "\"auto\"");
        assert_eq!(ToolChoice::default().as_str(), "auto");
    }
}

//! Mock AI Provider for testing.
//!
//! Provides a scripted implementation of the AIProvider port, allowing the
//! orchestration loop to be exercised without calling a real model.
//!
//! # Features
//!
//! - Scripted assistant turns (text and/or tool calls), consumed in order
//! - Simulated delays, globally or per turn, for timeout testing
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_tool_calls(vec![get_email_content_call])
//!     .with_text("Invoice forwarded");
//!
//! let first = provider.complete(request).await?;
//! assert!(first.turn.requests_tools());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::conversation::AssistantTurn;
use crate::domain::tools::ToolCallRequest;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo, TokenUsage,
};

/// Mock AI provider for testing.
///
/// Clones share the script and the call history.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Scripted responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A scripted mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return an assistant turn after an extra delay.
    Turn {
        turn: AssistantTurn,
        usage: TokenUsage,
        delay: Duration,
    },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate rate limiting.
    RateLimited { retry_after_secs: u32 },
    /// Simulate context too long.
    ContextTooLong { tokens: u32, max: u32 },
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate authentication failure.
    AuthenticationFailed,
    /// Simulate network error.
    Network { message: String },
    /// Simulate timeout.
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::ContextTooLong { tokens, max } => AIError::context_too_long(tokens, max),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::timeout(timeout_secs),
        }
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    /// Creates a new mock provider with an empty script.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds an assistant turn to the script.
    pub fn with_turn(self, turn: AssistantTurn) -> Self {
        self.with_delayed_turn(turn, Duration::ZERO)
    }

    /// Adds an assistant turn that is returned only after `delay`.
    pub fn with_delayed_turn(self, turn: AssistantTurn, delay: Duration) -> Self {
        locked(&self.responses).push_back(MockResponse::Turn {
            turn,
            usage: TokenUsage::new(10, 20),
            delay,
        });
        self
    }

    /// Adds a final text answer to the script.
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_turn(AssistantTurn::text(content))
    }

    /// Adds a turn requesting the given tool calls.
    pub fn with_tool_calls(self, calls: Vec<ToolCallRequest>) -> Self {
        self.with_turn(AssistantTurn::tool_calls(calls))
    }

    /// Adds an error response to the script.
    pub fn with_error(self, error: MockError) -> Self {
        locked(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency for every request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        locked(&self.calls).clone()
    }

    /// Gets the next scripted response or a plain text default.
    fn next_response(&self) -> MockResponse {
        locked(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Turn {
                turn: AssistantTurn::text("Mock response"),
                usage: TokenUsage::new(5, 10),
                delay: Duration::ZERO,
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        locked(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Turn { turn, usage, delay } => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Ok(CompletionResponse::new(turn, self.info.model.clone()).with_usage(usage))
            }
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}

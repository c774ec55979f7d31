//! ProcessEmailHandler - Drive the reasoning engine and tools for one email.
//!
//! One command is one independent run: a fresh conversation is seeded from
//! the inbound event, then the engine and the tool executor alternate until
//! the engine answers without tool calls, the turn budget is spent or the
//! run deadline passes.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::Instrument;

use crate::application::tools::ToolExecutor;
use crate::domain::conversation::{
    AssistantTurn, Conversation, ConversationError, DEFAULT_SYSTEM_PROMPT,
};
use crate::domain::email::{InboundEvent, ProcessingResult};
use crate::domain::foundation::{RunId, StateMachine, ValidationError};
use crate::domain::orchestration::{RunState, TurnBudget};
use crate::domain::tools::ToolDefinition;
use crate::ports::{AIError, AIProvider, CompletionRequest, RequestMetadata, ToolChoice};

/// Command to process one admitted webhook event.
#[derive(Debug, Clone)]
pub struct ProcessEmailCommand {
    pub event: InboundEvent,
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ProcessedEmail {
    pub result: ProcessingResult,
    /// Full conversation as it stood when the run finished.
    pub conversation: Conversation,
}

/// Errors that end a run in the failed state.
#[derive(Debug, Clone, Error)]
pub enum ProcessEmailError {
    /// The engine call failed or timed out.
    #[error("reasoning engine failed on turn {turn}: {source}")]
    ReasoningEngine {
        turn: u32,
        #[source]
        source: AIError,
    },

    /// The engine was still requesting tools when the budget ran out.
    #[error("tool loop exceeded maximum of {max_turns} turns")]
    LoopBoundExceeded { max_turns: u32 },

    /// The whole run took longer than its deadline.
    #[error("run exceeded its deadline of {deadline_ms}ms")]
    DeadlineExceeded { deadline_ms: u128 },

    /// The engine produced a turn that breaks conversation rules.
    #[error("conversation rejected engine output: {0}")]
    Conversation(#[from] ConversationError),

    /// Internal state machine misuse.
    #[error("invalid run state transition: {0}")]
    State(#[from] ValidationError),
}

impl ProcessEmailError {
    /// True when the engine failure was transient (rate limit, outage,
    /// network, timeout). Runs are never retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ReasoningEngine { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

/// A run that ended in the failed state, with its `error` result.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct FailedRun {
    pub result: ProcessingResult,
    #[source]
    pub error: ProcessEmailError,
}

/// Tunables of the orchestration loop.
#[derive(Debug, Clone)]
pub struct OrchestrationSettings {
    pub system_prompt: String,
    pub turn_budget: TurnBudget,
    pub engine_timeout: Duration,
    pub temperature: Option<f32>,
    /// Upper bound on one whole run, engine calls and tools included.
    pub run_deadline: Duration,
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            turn_budget: TurnBudget::default(),
            engine_timeout: Duration::from_secs(60),
            temperature: None,
            run_deadline: Duration::from_secs(600),
        }
    }
}

/// Handler running the engine/tool loop for one email.
pub struct ProcessEmailHandler {
    provider: Arc<dyn AIProvider>,
    executor: ToolExecutor,
    settings: OrchestrationSettings,
}

impl ProcessEmailHandler {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        executor: ToolExecutor,
        settings: OrchestrationSettings,
    ) -> Self {
        Self {
            provider,
            executor,
            settings,
        }
    }

    pub async fn handle(&self, cmd: ProcessEmailCommand) -> Result<ProcessedEmail, FailedRun> {
        let run_id = RunId::new();
        let span = tracing::info_span!(
            "process_email",
            run_id = %run_id,
            email_id = %cmd.event.email_id()
        );

        async move {
            let event = &cmd.event;
            let mut run = Run::new(run_id);
            let mut conversation =
                Conversation::seed(self.settings.system_prompt.clone(), event);

            let deadline = self.settings.run_deadline;
            let outcome =
                tokio::time::timeout(deadline, self.run(&mut run, &mut conversation, event))
                    .await
                    .unwrap_or(Err(ProcessEmailError::DeadlineExceeded {
                        deadline_ms: deadline.as_millis(),
                    }));

            match outcome {
                Ok(result) => Ok(ProcessedEmail {
                    result,
                    conversation,
                }),
                Err(error) => {
                    run.fail();
                    let result = ProcessingResult::failed(
                        run.id,
                        event.email_id().clone(),
                        conversation.tool_call_count(),
                        run.turns,
                    );
                    tracing::error!(
                        turns = run.turns,
                        tool_calls = result.tool_calls,
                        status = %result.status,
                        transient = error.is_transient(),
                        "Run failed: {}",
                        error
                    );
                    Err(FailedRun { result, error })
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        run: &mut Run,
        conversation: &mut Conversation,
        event: &InboundEvent,
    ) -> Result<ProcessingResult, ProcessEmailError> {
        let tools = self.executor.registry().all_declarations();
        let budget = self.settings.turn_budget;

        loop {
            run.advance(RunState::AwaitingModel)?;
            run.turns += 1;

            let response = self
                .call_engine(run, event, conversation, &tools)
                .await
                .map_err(|source| ProcessEmailError::ReasoningEngine {
                    turn: run.turns,
                    source,
                })?;

            let requests_tools = response.requests_tools();
            conversation.append_assistant_turn(response)?;

            if !requests_tools {
                run.advance(RunState::Done)?;
                let tool_calls = conversation.tool_call_count();
                let result = ProcessingResult::completed(
                    run.id,
                    event.email_id().clone(),
                    conversation.last_assistant_content().map(str::to_string),
                    tool_calls,
                    run.turns,
                );
                tracing::info!(
                    turns = run.turns,
                    tool_calls,
                    status = %result.status,
                    elapsed_ms = result
                        .timestamp
                        .duration_since(event.received_at())
                        .num_milliseconds(),
                    "Run completed"
                );
                return Ok(result);
            }

            if budget.is_exhausted(run.turns) {
                return Err(ProcessEmailError::LoopBoundExceeded {
                    max_turns: budget.max_turns(),
                });
            }

            run.advance(RunState::ToolsRequested)?;
            tracing::info!(
                turn = run.turns,
                requested = conversation.pending_tool_calls().len(),
                "Engine requested tools"
            );

            let results = self
                .executor
                .execute_all(conversation.pending_tool_calls())
                .await;
            conversation.append_tool_results(results)?;
        }
    }

    async fn call_engine(
        &self,
        run: &Run,
        event: &InboundEvent,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Result<AssistantTurn, AIError> {
        let mut request = CompletionRequest::new(RequestMetadata::new(
            run.id,
            event.email_id().clone(),
            run.turns,
        ))
        .with_messages(conversation.messages().to_vec())
        .with_tools(tools.to_vec())
        .with_tool_choice(ToolChoice::Auto);

        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }

        let timeout = self.settings.engine_timeout;
        match tokio::time::timeout(timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    turn = run.turns,
                    total_tokens = response.usage.total_tokens,
                    finish_reason = ?response.finish_reason,
                    "Engine responded"
                );
                Ok(response.turn)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(AIError::timeout(
                u32::try_from(timeout.as_secs()).unwrap_or(u32::MAX),
            )),
        }
    }
}

/// Mutable bookkeeping of one run.
struct Run {
    id: RunId,
    state: RunState,
    turns: u32,
}

impl Run {
    fn new(id: RunId) -> Self {
        Self {
            id,
            state: RunState::Seeded,
            turns: 0,
        }
    }

    fn advance(&mut self, next: RunState) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(next)?;
        Ok(())
    }

    fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = RunState::Failed;
        }
    }
}

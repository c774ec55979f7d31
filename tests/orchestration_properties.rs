//! Property tests for the orchestration loop and tool executor.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};

use mailflow::adapters::ai::MockAIProvider;
use mailflow::adapters::simulated::{SimulatedBusinessApi, SimulatedMailbox};
use mailflow::application::{
    FailedRun, OrchestrationSettings, ProcessEmailCommand, ProcessEmailError,
    ProcessEmailHandler, ToolExecutor, ToolRegistry,
};
use mailflow::domain::conversation::Message;
use mailflow::domain::email::{InboundEvent, ProcessingStatus};
use mailflow::domain::foundation::{CallId, EmailId};
use mailflow::domain::orchestration::TurnBudget;
use mailflow::domain::tools::{ToolCallRequest, ToolDefinition, ToolOutcome};
use mailflow::ports::{ToolFault, ToolHandler};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

/// Sleeps for `delay_ms` and echoes `tag` back.
struct EchoAfterDelay;

#[async_trait]
impl ToolHandler for EchoAfterDelay {
    async fn invoke(&self, arguments: Value) -> Result<Value, ToolFault> {
        let delay = arguments["delay_ms"].as_u64().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(json!({ "tag": arguments["tag"] }))
    }
}

fn echo_registry() -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry
        .register(
            ToolDefinition::new(
                "echo",
                "Echo the tag after a delay",
                json!({
                    "type": "object",
                    "properties": {
                        "tag": { "type": "integer" },
                        "delay_ms": { "type": "integer" }
                    },
                    "required": ["tag"]
                }),
            ),
            Arc::new(EchoAfterDelay),
        )
        .unwrap();
    Arc::new(registry)
}

fn email_handler(provider: MockAIProvider, max_turns: u32) -> ProcessEmailHandler {
    let registry = ToolRegistry::email_tools(
        Arc::new(SimulatedMailbox::new()),
        Arc::new(SimulatedBusinessApi::new()),
        "https://business.example.com/emails",
    )
    .unwrap();
    let settings = OrchestrationSettings {
        turn_budget: TurnBudget::new(max_turns).unwrap(),
        ..OrchestrationSettings::default()
    };
    ProcessEmailHandler::new(
        Arc::new(provider),
        ToolExecutor::new(Arc::new(registry), Duration::from_secs(2)),
        settings,
    )
}

fn command() -> ProcessEmailCommand {
    ProcessEmailCommand {
        event: InboundEvent::new(EmailId::new("123").unwrap(), "Subject", "a@b.com"),
    }
}

/// Tool names the engine may pick, including one that is not registered.
fn tool_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("get_email_content"),
        Just("send_to_api"),
        Just("mark_email_processed"),
        Just("no_such_tool"),
    ]
}

/// A script of engine turns; an empty turn is a final text answer.
fn engine_script() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    prop::collection::vec(prop::collection::vec(tool_name(), 0..4), 0..10)
}

fn scripted_provider(script: &[Vec<&'static str>]) -> MockAIProvider {
    script
        .iter()
        .enumerate()
        .fold(MockAIProvider::new(), |provider, (turn, tools)| {
            if tools.is_empty() {
                provider.with_text(format!("done after turn {}", turn + 1))
            } else {
                let calls = tools
                    .iter()
                    .enumerate()
                    .map(|(i, name)| {
                        ToolCallRequest::new(
                            CallId::new(format!("call_{}_{}", turn, i)).unwrap(),
                            *name,
                            json!({ "emailId": "123", "data": { "k": i } }),
                        )
                    })
                    .collect();
                provider.with_tool_calls(calls)
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn results_keep_request_order(delays in prop::collection::vec(0u64..15, 1..6)) {
        let rt = runtime();
        let executor = ToolExecutor::new(echo_registry(), Duration::from_secs(2));
        let requests: Vec<ToolCallRequest> = delays
            .iter()
            .enumerate()
            .map(|(i, delay)| {
                ToolCallRequest::new(
                    CallId::new(format!("call_{}", i)).unwrap(),
                    "echo",
                    json!({ "tag": i, "delay_ms": delay }),
                )
            })
            .collect();

        let results = rt.block_on(executor.execute_all(&requests));

        prop_assert_eq!(results.len(), requests.len());
        for (i, (request, result)) in requests.iter().zip(&results).enumerate() {
            prop_assert_eq!(result.call_id(), request.call_id());
            match result.outcome() {
                ToolOutcome::Success(payload) => prop_assert_eq!(&payload["tag"], &json!(i)),
                ToolOutcome::Failure(err) => prop_assert!(false, "unexpected failure: {:?}", err),
            }
        }
    }

    #[test]
    fn loop_terminates_within_bound(script in engine_script(), max_turns in 1u32..8) {
        let rt = runtime();
        let provider = scripted_provider(&script);
        let handler = email_handler(provider.clone(), max_turns);

        let outcome = rt.block_on(handler.handle(command()));

        prop_assert!(provider.call_count() as u32 <= max_turns);
        match outcome {
            Ok(processed) => {
                prop_assert!(processed.result.turns <= max_turns);
                prop_assert_eq!(processed.result.turns as usize, provider.call_count());
            }
            Err(FailedRun {
                result,
                error: ProcessEmailError::LoopBoundExceeded { max_turns: bound },
            }) => {
                prop_assert_eq!(bound, max_turns);
                prop_assert_eq!(provider.call_count() as u32, max_turns);
                prop_assert_eq!(result.status, ProcessingStatus::Error);
                prop_assert_eq!(result.turns, max_turns);
            }
            Err(other) => prop_assert!(false, "unexpected failure: {}", other),
        }
    }

    #[test]
    fn every_request_gets_exactly_one_result(script in engine_script()) {
        let rt = runtime();
        let provider = scripted_provider(&script);
        let handler = email_handler(provider, TurnBudget::MAX);

        let processed = rt.block_on(handler.handle(command())).unwrap();
        let conversation = &processed.conversation;

        let mut issued = Vec::new();
        let mut answered = Vec::new();
        for message in conversation.messages() {
            match message {
                Message::Assistant { tool_calls, .. } => {
                    issued.extend(tool_calls.iter().map(|c| c.call_id().clone()));
                }
                Message::Tool { call_id, result } => {
                    prop_assert_eq!(call_id, result.call_id());
                    answered.push(call_id.clone());
                }
                _ => {}
            }
        }

        prop_assert_eq!(conversation.tool_result_count(), conversation.tool_call_count());
        prop_assert_eq!(processed.result.tool_calls, issued.len());
        prop_assert_eq!(&answered, &issued);
        let unique: HashSet<_> = answered.iter().collect();
        prop_assert_eq!(unique.len(), answered.len());
    }
}

#[test]
fn registry_lookup_is_stable() {
    let registry = echo_registry();

    let first = registry.lookup("echo").unwrap();
    let second = registry.lookup("echo").unwrap();

    assert_eq!(first.definition(), second.definition());
    assert!(Arc::ptr_eq(first.handler(), second.handler()));
}

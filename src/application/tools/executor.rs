//! Tool executor - turns tool call requests into tool call results.
//!
//! Never fails: unknown tools, invalid arguments, collaborator errors and
//! timeouts all come back as error payloads tagged with the request's call
//! id, so the reasoning engine can see them and adapt.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use super::registry::ToolRegistry;
use crate::domain::tools::{ToolCallRequest, ToolCallResult, ToolErrorKind};
use crate::ports::{ServiceError, ToolFault};

/// Executes tool calls against a registry with a per-call timeout.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Executes one request. Each call is attempted exactly once.
    pub async fn execute(&self, request: &ToolCallRequest) -> ToolCallResult {
        let call_id = request.call_id().clone();
        let name = request.tool_name();

        let tool = match self.registry.lookup(name) {
            Ok(tool) => tool,
            Err(err) => {
                tracing::warn!(tool = %name, call_id = %call_id, "Engine requested unknown tool");
                return ToolCallResult::failure(
                    call_id,
                    name,
                    ToolErrorKind::UnknownTool,
                    err.to_string(),
                );
            }
        };

        if let Err(violation) = tool.schema().validate(request.arguments()) {
            tracing::warn!(tool = %name, call_id = %call_id, "Invalid tool arguments: {}", violation);
            return ToolCallResult::failure(
                call_id,
                name,
                ToolErrorKind::InvalidArguments,
                violation.to_string(),
            );
        }

        tracing::debug!(tool = %name, call_id = %call_id, "Executing tool");

        let invocation = tool.handler().invoke(request.arguments().clone());
        match tokio::time::timeout(self.timeout, invocation).await {
            Ok(Ok(payload)) => ToolCallResult::success(call_id, name, payload),
            Ok(Err(fault)) => {
                tracing::warn!(tool = %name, call_id = %call_id, "Tool failed: {}", fault);
                let kind = match &fault {
                    ToolFault::InvalidArguments(_) => ToolErrorKind::InvalidArguments,
                    ToolFault::Service(ServiceError::Timeout { .. }) => ToolErrorKind::Timeout,
                    ToolFault::Service(_) => ToolErrorKind::ExecutionFailed,
                };
                ToolCallResult::failure(call_id, name, kind, fault.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    tool = %name,
                    call_id = %call_id,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Tool timed out"
                );
                ToolCallResult::failure(
                    call_id,
                    name,
                    ToolErrorKind::Timeout,
                    format!("Tool timed out after {}ms", self.timeout.as_millis()),
                )
            }
        }
    }

    /// Executes all requests of one turn concurrently.
    ///
    /// Results are returned in request order, whatever order they finish in.
    pub async fn execute_all(&self, requests: &[ToolCallRequest]) -> Vec<ToolCallResult> {
        join_all(requests.iter().map(|request| self.execute(request))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CallId;
    use crate::domain::tools::{ToolDefinition, ToolOutcome};
    use crate::ports::ToolHandler;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns its arguments after an optional delay, counting calls.
    struct SleepyTool {
        delay: Duration,
        calls: AtomicUsize,
    }

    impl SleepyTool {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ToolHandler for SleepyTool {
        async fn invoke(&self, arguments: Value) -> Result<Value, ToolFault> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(arguments)
        }
    }

    struct FailingTool(ToolFault);

    #[async_trait]
    impl ToolHandler for FailingTool {
        async fn invoke(&self, _arguments: Value) -> Result<Value, ToolFault> {
            Err(self.0.clone())
        }
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": { "n": { "type": "integer" } },
            "required": ["n"]
        })
    }

    fn dyn_tool<T: ToolHandler + 'static>(tool: Arc<T>) -> Arc<dyn ToolHandler> {
        tool
    }

    fn executor_with(tools: Vec<(&str, Arc<dyn ToolHandler>)>, timeout: Duration) -> ToolExecutor {
        let mut registry = ToolRegistry::new();
        for (name, handler) in tools {
            registry
                .register(ToolDefinition::new(name, "test", schema()), handler)
                .unwrap();
        }
        ToolExecutor::new(Arc::new(registry), timeout)
    }

    fn request(id: &str, tool: &str, args: Value) -> ToolCallRequest {
        ToolCallRequest::new(CallId::new(id).unwrap(), tool, args)
    }

    #[tokio::test]
    async fn successful_call_returns_payload() {
        let tool = SleepyTool::new(Duration::ZERO);
        let executor = executor_with(vec![("echo", dyn_tool(tool.clone()))], Duration::from_secs(1));

        let result = executor.execute(&request("c1", "echo", json!({ "n": 1 }))).await;

        assert_eq!(result.call_id().as_str(), "c1");
        assert_eq!(result.outcome(), &ToolOutcome::Success(json!({ "n": 1 })));
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_error_payload() {
        let executor = executor_with(vec![], Duration::from_secs(1));

        let result = executor
            .execute(&request("c1", "delete_everything", json!({})))
            .await;

        assert_eq!(result.call_id().as_str(), "c1");
        let err = result.error().unwrap();
        assert_eq!(err.kind, ToolErrorKind::UnknownTool);
        assert!(err.message.contains("delete_everything"));
    }

    #[tokio::test]
    async fn invalid_arguments_skip_the_handler() {
        let tool = SleepyTool::new(Duration::ZERO);
        let executor = executor_with(vec![("echo", dyn_tool(tool.clone()))], Duration::from_secs(1));

        let result = executor
            .execute(&request("c1", "echo", json!({ "n": "one" })))
            .await;

        assert_eq!(result.error().unwrap().kind, ToolErrorKind::InvalidArguments);
        assert_eq!(tool.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn collaborator_failure_becomes_error_payload() {
        let executor = executor_with(
            vec![(
                "broken",
                dyn_tool(Arc::new(FailingTool(ToolFault::Service(
                    ServiceError::unavailable("down"),
                )))),
            )],
            Duration::from_secs(1),
        );

        let result = executor.execute(&request("c1", "broken", json!({ "n": 1 }))).await;

        let err = result.error().unwrap();
        assert_eq!(err.kind, ToolErrorKind::ExecutionFailed);
        assert!(err.message.contains("down"));
    }

    #[tokio::test]
    async fn collaborator_timeout_maps_to_timeout_kind() {
        let executor = executor_with(
            vec![(
                "slow",
                dyn_tool(Arc::new(FailingTool(ToolFault::Service(
                    ServiceError::Timeout { timeout_secs: 5 },
                )))),
            )],
            Duration::from_secs(1),
        );

        let result = executor.execute(&request("c1", "slow", json!({ "n": 1 }))).await;
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::Timeout);
    }

    #[tokio::test]
    async fn slow_handler_times_out() {
        let executor = executor_with(
            vec![("slow", dyn_tool(SleepyTool::new(Duration::from_secs(5))))],
            Duration::from_millis(20),
        );

        let result = executor.execute(&request("c1", "slow", json!({ "n": 1 }))).await;

        assert_eq!(result.call_id().as_str(), "c1");
        assert_eq!(result.error().unwrap().kind, ToolErrorKind::Timeout);
    }

    #[tokio::test]
    async fn execute_all_preserves_request_order() {
        let executor = executor_with(
            vec![
                ("slow", dyn_tool(SleepyTool::new(Duration::from_millis(60)))),
                ("medium", dyn_tool(SleepyTool::new(Duration::from_millis(30)))),
                ("fast", dyn_tool(SleepyTool::new(Duration::ZERO))),
            ],
            Duration::from_secs(1),
        );
        let requests = vec![
            request("a", "slow", json!({ "n": 1 })),
            request("b", "medium", json!({ "n": 2 })),
            request("c", "fast", json!({ "n": 3 })),
        ];

        let results = executor.execute_all(&requests).await;

        let ids: Vec<_> = results.iter().map(|r| r.call_id().as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(results.iter().all(ToolCallResult::is_success));
    }

    #[tokio::test]
    async fn execute_all_runs_calls_concurrently() {
        let executor = executor_with(
            vec![("sleepy", dyn_tool(SleepyTool::new(Duration::from_millis(100))))],
            Duration::from_secs(5),
        );
        let requests: Vec<_> = (0..5)
            .map(|i| request(&format!("c{}", i), "sleepy", json!({ "n": i })))
            .collect();

        let started = std::time::Instant::now();
        let results = executor.execute_all(&requests).await;

        assert_eq!(results.len(), 5);
        assert!(started.elapsed() < Duration::from_millis(450));
    }
}

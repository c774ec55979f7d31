//! Minimal JSON-RPC 2.0 client for MCP `tools/call`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ports::ServiceError;

/// MCP JSON-RPC request
#[derive(Debug, Serialize)]
struct McpRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

/// MCP JSON-RPC response
#[derive(Debug, Deserialize)]
struct McpResponse {
    result: Option<Value>,
    error: Option<McpError>,
}

/// MCP error
#[derive(Debug, Deserialize)]
struct McpError {
    code: i32,
    message: String,
}

/// Output of a tool call on the MCP server.
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolOutput {
    /// Concatenated text content blocks.
    pub text: String,
    /// `structuredContent`, or the text parsed as JSON when it is JSON.
    pub structured: Option<Value>,
    /// The server flagged the call as failed.
    pub is_error: bool,
}

impl McpToolOutput {
    fn from_result(result: Value) -> Self {
        let text = result
            .get("content")
            .and_then(Value::as_array)
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                    .filter_map(|b| b.get("text").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        let structured = result
            .get("structuredContent")
            .cloned()
            .or_else(|| serde_json::from_str(&text).ok());

        let is_error = result
            .get("isError")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Self {
            text,
            structured,
            is_error,
        }
    }
}

/// HTTP JSON-RPC client for one MCP server.
#[derive(Debug)]
pub struct McpClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
    request_id: AtomicU64,
}

impl McpClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Calls `tool_name` on the server.
    pub async fn call_tool(
        &self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<McpToolOutput, ServiceError> {
        let request = McpRequest {
            jsonrpc: "2.0",
            id: self.request_id.fetch_add(1, Ordering::Relaxed),
            method: "tools/call",
            params: serde_json::json!({
                "name": tool_name,
                "arguments": arguments
            }),
        };

        tracing::debug!(tool = %tool_name, endpoint = %self.endpoint, "Calling MCP tool");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::rejected(status.as_u16(), body));
        }

        let rpc: McpResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::invalid_response(format!("Invalid JSON-RPC reply: {}", e)))?;

        Self::into_output(rpc)
    }

    fn into_output(rpc: McpResponse) -> Result<McpToolOutput, ServiceError> {
        if let Some(err) = rpc.error {
            return Err(ServiceError::invalid_response(format!(
                "MCP error {}: {}",
                err.code, err.message
            )));
        }
        let result = rpc
            .result
            .ok_or_else(|| ServiceError::invalid_response("JSON-RPC reply has no result"))?;
        Ok(McpToolOutput::from_result(result))
    }

    fn transport_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ServiceError::unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_is_json_rpc_tools_call() {
        let request = McpRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "tools/call",
            params: json!({ "name": "get_email", "arguments": { "id": "1" } }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "tools/call");
        assert_eq!(json["params"]["name"], "get_email");
    }

    #[test]
    fn text_content_is_collected() {
        let output = McpToolOutput::from_result(json!({
            "content": [
                { "type": "text", "text": "Hello" },
                { "type": "image", "data": "..." },
                { "type": "text", "text": "World" }
            ]
        }));

        assert_eq!(output.text, "Hello\nWorld");
        assert!(output.structured.is_none());
        assert!(!output.is_error);
    }

    #[test]
    fn json_text_is_exposed_as_structured() {
        let output = McpToolOutput::from_result(json!({
            "content": [{ "type": "text", "text": "{\"success\":true}" }]
        }));

        assert_eq!(output.structured, Some(json!({ "success": true })));
    }

    #[test]
    fn structured_content_wins() {
        let output = McpToolOutput::from_result(json!({
            "content": [],
            "structuredContent": { "a": 1 },
            "isError": true
        }));

        assert_eq!(output.structured, Some(json!({ "a": 1 })));
        assert!(output.is_error);
    }

    #[test]
    fn rpc_error_is_invalid_response() {
        let rpc: McpResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32601, "message": "Method not found" }
        }))
        .unwrap();

        let err = McpClient::into_output(rpc).unwrap_err();
        assert!(err.to_string().contains("Method not found"));
    }

    #[test]
    fn missing_result_is_invalid_response() {
        let rpc: McpResponse =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1 })).unwrap();
        assert!(matches!(
            McpClient::into_output(rpc),
            Err(ServiceError::InvalidResponse(_))
        ));
    }
}

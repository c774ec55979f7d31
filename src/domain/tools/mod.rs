//! Tool vocabulary - what the reasoning engine may ask us to do.
//!
//! ## Key Types
//!
//! - [`ToolDefinition`] - Name, description and parameter schema of a tool
//! - [`ToolCallRequest`] - One call the engine asked for in an assistant turn
//! - [`ToolCallResult`] - Outcome of that call, success payload or error
//! - [`EmailTool`] - The closed set of tools this service exposes
//!
//! Tool failures are data: every request gets a result, and an error result
//! is fed back to the engine rather than aborting the run.

mod email_tools;
mod schema;
mod tool_call;
mod tool_definition;
mod tool_result;

pub use email_tools::{
    EmailFormat, EmailTool, GetEmailContentArgs, MarkEmailProcessedArgs, SendToApiArgs,
};
pub use schema::{ArgumentSchema, SchemaViolation};
pub use tool_call::ToolCallRequest;
pub use tool_definition::ToolDefinition;
pub use tool_result::{ToolCallResult, ToolError, ToolErrorKind, ToolOutcome};

//! MCP adapters.
//!
//! The mail server is reached through its Model Context Protocol endpoint
//! using JSON-RPC 2.0 `tools/call` requests over HTTP.

mod client;
mod mailbox;

pub use client::{McpClient, McpToolOutput};
pub use mailbox::McpMailbox;

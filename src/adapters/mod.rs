//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Reasoning engine clients (OpenAI, scripted mock)
//! - `mcp` - Mail server reached over MCP JSON-RPC
//! - `business` - Downstream business API over HTTP
//! - `simulated` - In-process tool collaborators with canned replies
//! - `http` - Webhook and health endpoints

pub mod ai;
pub mod business;
pub mod http;
pub mod mcp;
pub mod simulated;

//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `email` - Inbound notification and the processing result
//! - `webhook` - Shared-secret gate and payload parsing
//! - `tools` - Tool declarations, call requests/results, argument validation
//! - `conversation` - Append-only message log handed to the reasoning engine
//! - `orchestration` - Run lifecycle and turn bound

pub mod conversation;
pub mod email;
pub mod foundation;
pub mod orchestration;
pub mod tools;
pub mod webhook;

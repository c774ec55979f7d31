//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod tools;

pub use handlers::{
    FailedRun, OrchestrationSettings, ProcessEmailCommand, ProcessEmailError,
    ProcessEmailHandler, ProcessedEmail,
};
pub use tools::{ToolExecutor, ToolRegistry};

//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod email;

pub use email::{
    FailedRun, OrchestrationSettings, ProcessEmailCommand, ProcessEmailError,
    ProcessEmailHandler, ProcessedEmail,
};

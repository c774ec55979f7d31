//! Email processing handlers.

mod process_email;

pub use process_email::{
    FailedRun, OrchestrationSettings, ProcessEmailCommand, ProcessEmailError,
    ProcessEmailHandler, ProcessedEmail,
};

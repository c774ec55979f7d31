//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, the state machine trait and validation errors
//! used across the webhook, tool and orchestration modules.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{CallId, EmailId, RunId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

//! Email module - what arrives on the webhook and what a run produces.

mod inbound_event;
mod processing_result;

pub use inbound_event::InboundEvent;
pub use processing_result::{ProcessingResult, ProcessingStatus};

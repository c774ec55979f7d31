//! Webhook module - authentication and parsing of inbound notifications.

mod errors;
mod gate;

pub use errors::WebhookError;
pub use gate::{WebhookGate, CLIENT_STATE_HEADER};

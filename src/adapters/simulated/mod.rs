//! Simulated tool collaborators.
//!
//! In-process stand-ins for the mail server and the business API that
//! return canned responses and keep a bounded log of recent calls. Used by
//! tests and when `tools.simulate` is enabled.

mod business_api;
mod call_log;
mod mailbox;

pub use business_api::SimulatedBusinessApi;
pub use call_log::CALL_LOG_CAPACITY;
pub use mailbox::SimulatedMailbox;

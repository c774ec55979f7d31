//! Conversation module - the message log handed to the reasoning engine.
//!
//! A [`Conversation`] is created per webhook delivery and only ever grows:
//! system, user, then alternating assistant turns and their tool results.

mod builder;
mod errors;
mod message;
mod prompt;

pub use builder::Conversation;
pub use errors::ConversationError;
pub use message::{AssistantTurn, Message};
pub use prompt::{render_user_turn, DEFAULT_SYSTEM_PROMPT};

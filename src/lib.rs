//! Mailflow - Webhook-driven email processing
//!
//! Inbound email notifications are authenticated, turned into a conversation
//! with a tool-calling language model, and driven through a bounded loop in
//! which the model reads the email, forwards extracted data to a business
//! API, and marks the email processed.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

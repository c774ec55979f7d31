//! Ports - Interfaces between the application core and the outside world.
//!
//! # Module Organization
//!
//! - `ai_provider` - The reasoning engine
//! - `tool_handler` - The code behind one registered tool
//! - `mailbox_service` - Mail server operations used by tools
//! - `business_api` - Downstream business API used by tools

mod ai_provider;
mod business_api;
mod mailbox_service;
mod tool_handler;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage, ToolChoice,
};
pub use business_api::{BusinessApi, DeliveryStatus};
pub use mailbox_service::{EmailContent, MailboxService, ProcessedAck, ServiceError};
pub use tool_handler::{ToolFault, ToolHandler};

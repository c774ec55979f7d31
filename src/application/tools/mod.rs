//! Tool registry, executor and the handlers behind the email tools.

mod email_tools;
mod executor;
mod registry;

pub use email_tools::{
    EndpointPolicy, GetEmailContentTool, MarkEmailProcessedTool, SendToApiTool,
};
pub use executor::ToolExecutor;
pub use registry::{RegisteredTool, RegistryError, ToolRegistry, UnknownToolError};

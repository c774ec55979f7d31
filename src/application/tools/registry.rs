//! Tool registry - maps tool names to declarations and handlers.
//!
//! Built once at startup and shared read-only across requests.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use super::email_tools::{
    EndpointPolicy, GetEmailContentTool, MarkEmailProcessedTool, SendToApiTool,
};
use crate::domain::foundation::ValidationError;
use crate::domain::tools::{ArgumentSchema, EmailTool, ToolDefinition};
use crate::ports::{BusinessApi, MailboxService, ToolHandler};

/// Startup errors while building the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("tool '{tool}' has an invalid declaration: {source}")]
    InvalidDeclaration {
        tool: String,
        #[source]
        source: ValidationError,
    },
}

/// Lookup of a tool that was never registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownToolError(pub String);

/// A declaration paired with its compiled schema and the handler that
/// implements it.
pub struct RegisteredTool {
    definition: ToolDefinition,
    schema: ArgumentSchema,
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    pub fn schema(&self) -> &ArgumentSchema {
        &self.schema
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.definition.name())
            .finish_non_exhaustive()
    }
}

/// Registry of available tools, in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry for the fixed email tool set.
    pub fn email_tools(
        mailbox: Arc<dyn MailboxService>,
        business_api: Arc<dyn BusinessApi>,
        endpoints: impl Into<EndpointPolicy>,
    ) -> Result<Self, RegistryError> {
        let endpoints = endpoints.into();
        let mut registry = Self::new();

        for tool in EmailTool::ALL {
            let handler: Arc<dyn ToolHandler> = match tool {
                EmailTool::GetEmailContent => Arc::new(GetEmailContentTool::new(mailbox.clone())),
                EmailTool::SendToApi => {
                    Arc::new(SendToApiTool::new(business_api.clone(), endpoints.clone()))
                }
                EmailTool::MarkEmailProcessed => {
                    Arc::new(MarkEmailProcessedTool::new(mailbox.clone()))
                }
            };
            registry.register(tool.definition(), handler)?;
        }

        Ok(registry)
    }

    /// Registers a tool, compiling its parameter schema.
    ///
    /// Fails if the name is taken or the declaration is malformed.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        let name = definition.name().to_string();

        let schema =
            definition
                .compile_schema()
                .map_err(|source| RegistryError::InvalidDeclaration {
                    tool: name.clone(),
                    source,
                })?;

        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            definition,
            schema,
            handler,
        });
        Ok(())
    }

    /// Finds a tool by name.
    pub fn lookup(&self, name: &str) -> Result<&RegisteredTool, UnknownToolError> {
        self.index
            .get(name)
            .map(|&i| &self.tools[i])
            .ok_or_else(|| UnknownToolError(name.to_string()))
    }

    /// All declarations, in registration order.
    pub fn all_declarations(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Returns the number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

//! Tool collaborator configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where the tools send their requests
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    /// MCP endpoint of the mail server
    #[serde(default = "default_mcp_server_url")]
    pub mcp_server_url: String,

    /// Used by `send_to_api` when the engine gives no endpoint
    #[serde(default = "default_business_api_endpoint")]
    pub business_api_endpoint: String,

    /// Further endpoints `send_to_api` may target when the engine names one
    #[serde(default)]
    pub allowed_endpoints: Vec<String>,

    /// Wire the in-process simulated collaborators instead of MCP/HTTP
    #[serde(default)]
    pub simulate: bool,
}

impl ToolsConfig {
    /// Validate tool configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_url("tools.mcp_server_url", &self.mcp_server_url)?;
        check_url("tools.business_api_endpoint", &self.business_api_endpoint)?;
        for endpoint in &self.allowed_endpoints {
            check_url("tools.allowed_endpoints", endpoint)?;
        }
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mcp_server_url: default_mcp_server_url(),
            business_api_endpoint: default_business_api_endpoint(),
            allowed_endpoints: Vec::new(),
            simulate: false,
        }
    }
}

fn default_mcp_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_business_api_endpoint() -> String {
    "http://localhost:3000/api/email-data".to_string()
}

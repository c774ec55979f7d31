//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MAILFLOW` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use mailflow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod orchestration;
mod server;
mod tools;
mod webhook;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use orchestration::OrchestrationConfig;
pub use server::{Environment, ServerConfig};
pub use tools::ToolsConfig;
pub use webhook::WebhookConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Webhook shared secret
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Reasoning engine (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Loop bound, tool timeout, prompt
    #[serde(default)]
    pub orchestration: OrchestrationConfig,

    /// Tool collaborators (MCP server, business API)
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MAILFLOW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MAILFLOW__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MAILFLOW__WEBHOOK__CLIENT_STATE=...` -> `webhook.client_state = ...`
    /// - `MAILFLOW__TOOLS__ALLOWED_ENDPOINTS=https://a,https://b` -> a list
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MAILFLOW")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("tools.allowed_endpoints"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.webhook.validate()?;
        self.ai.validate()?;
        self.orchestration.validate()?;
        self.tools.validate()?;
        self.check_run_fits_request_timeout()
    }

    /// The request deadline must cover the worst-case run: every engine
    /// call timing out, with a tool turn timing out between each pair.
    fn check_run_fits_request_timeout(&self) -> Result<(), ValidationError> {
        let turns = u64::from(self.orchestration.max_turns);
        let required = turns * self.ai.timeout_secs
            + turns.saturating_sub(1) * self.orchestration.tool_timeout_secs;
        let configured = self.server.request_timeout_secs;

        if configured < required {
            return Err(ValidationError::RequestTimeoutTooShort {
                configured,
                required,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

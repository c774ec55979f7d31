//! Webhook intake configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Webhook configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookConfig {
    /// Shared secret expected in `X-Client-State`
    pub client_state: Option<Secret<String>>,
}

impl WebhookConfig {
    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.client_state {
            Some(secret) if !secret.expose_secret().is_empty() => Ok(()),
            _ => Err(ValidationError::MissingRequired("WEBHOOK__CLIENT_STATE")),
        }
    }

    /// The configured secret; only meaningful after `validate` succeeded.
    pub fn client_state(&self) -> Result<Secret<String>, ValidationError> {
        self.validate()?;
        self.client_state
            .clone()
            .ok_or(ValidationError::MissingRequired("WEBHOOK__CLIENT_STATE"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_fails() {
        assert!(WebhookConfig::default().validate().is_err());
    }

    #[test]
    fn test_empty_secret_fails() {
        let config = WebhookConfig {
            client_state: Some(Secret::new(String::new())),
        };
        assert!(config.validate().is_err());
        assert!(config.client_state().is_err());
    }

    #[test]
    fn test_secret_is_returned_and_redacted() {
        let config = WebhookConfig {
            client_state: Some(Secret::new("s3cret".to_string())),
        };
        assert_eq!(config.client_state().unwrap().expose_secret(), "s3cret");
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}

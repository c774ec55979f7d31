//! Orchestration loop configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::orchestration::TurnBudget;

/// Loop bound, tool timeout and prompt override
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrationConfig {
    /// Maximum reasoning-engine calls per email
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Timeout for a single tool invocation, in seconds
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,

    /// Replaces the built-in system prompt
    pub system_prompt: Option<String>,
}

impl OrchestrationConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn turn_budget(&self) -> Result<TurnBudget, ValidationError> {
        TurnBudget::new(self.max_turns).map_err(|_| ValidationError::InvalidMaxTurns {
            max: TurnBudget::MAX,
        })
    }

    /// Validate orchestration configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.turn_budget()?;
        if self.tool_timeout_secs == 0 {
            return Err(ValidationError::InvalidToolTimeout);
        }
        Ok(())
    }
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            tool_timeout_secs: default_tool_timeout(),
            system_prompt: None,
        }
    }
}

fn default_max_turns() -> u32 {
    TurnBudget::DEFAULT.max_turns()
}

fn default_tool_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestrationConfig::default();
        assert_eq!(config.max_turns, 6);
        assert_eq!(config.tool_timeout(), Duration::from_secs(30));
        assert!(config.system_prompt.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_turns_bounds() {
        for bad in [0, 51] {
            let config = OrchestrationConfig {
                max_turns: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ValidationError::InvalidMaxTurns { max: 50 })
            ));
        }

        let config = OrchestrationConfig {
            max_turns: 50,
            ..Default::default()
        };
        assert_eq!(config.turn_budget().unwrap().max_turns(), 50);
    }

    #[test]
    fn test_zero_tool_timeout_fails() {
        let config = OrchestrationConfig {
            tool_timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidToolTimeout)
        ));
    }
}

//! Upper bound on reasoning-engine calls per run.

use crate::domain::foundation::ValidationError;

/// Maximum number of reasoning-engine calls one run may make.
///
/// Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnBudget(u32);

impl TurnBudget {
    pub const DEFAULT: TurnBudget = TurnBudget(6);
    pub const MAX: u32 = 50;

    pub fn new(max_turns: u32) -> Result<Self, ValidationError> {
        if max_turns == 0 || max_turns > Self::MAX {
            return Err(ValidationError::invalid_format(
                "max_turns",
                format!("must be between 1 and {}, got {}", Self::MAX, max_turns),
            ));
        }
        Ok(Self(max_turns))
    }

    pub fn max_turns(&self) -> u32 {
        self.0
    }

    /// True when `turns_taken` calls leave no room for another.
    pub fn is_exhausted(&self, turns_taken: u32) -> bool {
        turns_taken >= self.0
    }
}

impl Default for TurnBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_oversized_budgets() {
        assert!(TurnBudget::new(0).is_err());
        assert!(TurnBudget::new(TurnBudget::MAX + 1).is_err());
        assert_eq!(TurnBudget::new(1).unwrap().max_turns(), 1);
    }

    #[test]
    fn exhausted_once_all_turns_are_used() {
        let budget = TurnBudget::new(3).unwrap();
        assert!(!budget.is_exhausted(2));
        assert!(budget.is_exhausted(3));
    }

    #[test]
    fn default_is_six() {
        assert_eq!(TurnBudget::default().max_turns(), 6);
    }
}

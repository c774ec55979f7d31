//! Orchestration module - lifecycle and bounds of one processing run.

mod run_state;
mod turn_budget;

pub use run_state::RunState;
pub use turn_budget::TurnBudget;

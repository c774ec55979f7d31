//! Run state machine.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Lifecycle of one orchestration run.
///
/// ```text
/// Seeded -> AwaitingModel -> (ToolsRequested -> AwaitingModel)* -> Done
///                 |                  |
///                 +------> Failed <--+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Conversation built, engine not yet called
    Seeded,

    /// Waiting on the reasoning engine
    AwaitingModel,

    /// Executing the tool calls of the last assistant turn
    ToolsRequested,

    /// Engine answered without tool calls
    Done,

    /// Engine failure, broken conversation or turn bound reached
    Failed,
}

impl StateMachine for RunState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RunState::*;
        matches!(
            (self, target),
            (Seeded, AwaitingModel)
                | (Seeded, Failed)
                | (AwaitingModel, ToolsRequested)
                | (AwaitingModel, Done)
                | (AwaitingModel, Failed)
                | (ToolsRequested, AwaitingModel)
                | (ToolsRequested, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RunState::*;
        match self {
            Seeded => vec![AwaitingModel, Failed],
            AwaitingModel => vec![ToolsRequested, Done, Failed],
            ToolsRequested => vec![AwaitingModel, Failed],
            Done | Failed => vec![],
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Seeded => "seeded",
            RunState::AwaitingModel => "awaiting_model",
            RunState::ToolsRequested => "tools_requested",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

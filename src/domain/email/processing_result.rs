//! Terminal output of one orchestration run.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EmailId, RunId, Timestamp};

/// How a run concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// The engine finished after at least one tool call
    Processed,

    /// The engine finished without calling any tool
    NoActionNeeded,

    /// The run failed
    Error,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::NoActionNeeded => "no_action_needed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one email notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub run_id: RunId,
    pub status: ProcessingStatus,
    pub email_id: EmailId,
    /// Final assistant text, if the engine produced any
    pub summary: Option<String>,
    pub timestamp: Timestamp,
    /// Number of tool calls issued during the run
    pub tool_calls: usize,
    /// Number of reasoning-engine invocations
    pub turns: u32,
}

impl ProcessingResult {
    /// Builds the result of a run that ended with a final assistant turn.
    ///
    /// Status is `processed` when any tool call was made, whatever its
    /// outcome, otherwise `no_action_needed`.
    pub fn completed(
        run_id: RunId,
        email_id: EmailId,
        summary: Option<String>,
        tool_calls: usize,
        turns: u32,
    ) -> Self {
        let status = if tool_calls > 0 {
            ProcessingStatus::Processed
        } else {
            ProcessingStatus::NoActionNeeded
        };

        Self {
            run_id,
            status,
            email_id,
            summary,
            timestamp: Timestamp::now(),
            tool_calls,
            turns,
        }
    }

    /// Builds the result of a run that ended in the failed state.
    pub fn failed(run_id: RunId, email_id: EmailId, tool_calls: usize, turns: u32) -> Self {
        Self {
            run_id,
            status: ProcessingStatus::Error,
            email_id,
            summary: None,
            timestamp: Timestamp::now(),
            tool_calls,
            turns,
        }
    }
}

//! Processing state of an orchestrator

use std::fmt;

use serde::Serialize;

/// Where an orchestrator is in its request lifecycle
///
/// `Idle → Processing → Completed | Failed`. The terminal states stay
/// until a reset, a new image, or the next submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingState {
    #[default]
    Idle,
    Processing,
    Completed,
    Failed,
}

impl ProcessingState {
    /// Whether a request has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingState::Completed | ProcessingState::Failed)
    }
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessingState::Idle => "idle",
            ProcessingState::Processing => "processing",
            ProcessingState::Completed => "completed",
            ProcessingState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
